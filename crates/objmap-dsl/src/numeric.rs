use objmap::{Error, Value};

pub(crate) fn value_to_f64(value: &Value) -> objmap::Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::compute(format!("Cannot represent {n} as a number"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::compute(format!("Cannot parse '{s}' as a number"))),
        other => Err(Error::type_mismatch("number", other)),
    }
}
