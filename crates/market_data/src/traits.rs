use crate::remote::RemoteError;

pub trait RemoteResponse<T> {
    fn to_model(&self) -> Result<T, RemoteError>;
}

pub(crate) fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, RemoteError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RemoteError::Malformed {
            field,
            value: raw.to_string(),
        })
}
