use serde::Serialize;
use webnovel_client::ApiResponse;

/// Writes command results either as text or as the `{success, data, error}`
/// envelope
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Prints `data` as JSON, or hands it to `text` for the plain rendering
    pub fn emit<T, F>(&self, data: &T, text: F) -> Result<(), anyhow::Error>
    where
        T: Serialize,
        F: FnOnce(&T),
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&ApiResponse::ok(data))?);
        } else {
            text(data);
        }
        Ok(())
    }

    pub fn message(&self, message: &str) -> Result<(), anyhow::Error> {
        self.emit(&serde_json::json!({ "message": message }), |_| {
            println!("{message}")
        })
    }

    pub fn fail(&self, err: &anyhow::Error) {
        if self.json {
            let res = ApiResponse::<()>::err(err);
            match serde_json::to_string_pretty(&res) {
                Ok(body) => println!("{body}"),
                Err(_) => println!(r#"{{"success":false}}"#),
            }
        } else {
            eprintln!("error: {err}");
        }
    }
}
