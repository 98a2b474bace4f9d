use serde::Serialize;

use crate::error::Error;

/// `{success, data?, error?}` shape handed to presentation code
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

impl<T> From<Result<T, Error>> for ApiResponse<T> {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let ok: ApiResponse<u32> = Ok(3).into();
        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"{"success":true,"data":3}"#
        );

        let err: ApiResponse<u32> = Err(Error::NotFound).into();
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            r#"{"success":false,"error":"The requested resource was not found."}"#
        );
    }
}
