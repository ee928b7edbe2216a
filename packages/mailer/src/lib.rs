use std::collections::HashMap;

pub mod models;
use reqwest::{header, Client};

use crate::models::SendEmailResponse;

#[derive(Debug, Clone)]
pub struct MailerOptions {
    pub api_url: String,
    pub api_key: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct MailerService {
    options: MailerOptions,
}

impl MailerService {
    pub fn new(options: MailerOptions) -> Self {
        Self { options }
    }

    pub async fn send_verification_email(
        self: &MailerService,
        recipient: &str,
        verification_url: &str,
    ) -> Result<SendEmailResponse, &'static str> {
        let api_url = self.options.api_url.clone();
        let api_key = self.options.api_key.clone();
        let from_address = self.options.from_address.clone();

        let url = format!("{api_url}/v1/messages");

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "Content-Type",
            "application/json"
                .parse()
                .expect("Header value should parse correctly"),
        );

        let body_text = format!(
            "Hi,\n\nClick the link below to verify your email address:\n\n{}\n\nIf you did not request this, you can ignore this email.",
            verification_url
        );

        let mut json_body: HashMap<&str, String> = HashMap::new();
        json_body.insert("to", recipient.to_string());
        json_body.insert("from", from_address);
        json_body.insert("subject", "Verify your email".to_string());
        json_body.insert("text", body_text);

        let client = Client::new();
        let res = client
            .post(url)
            .bearer_auth(api_key)
            .headers(headers)
            .json(&json_body)
            .send()
            .await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    // Log the error response from the mail relay
                    let error_body = response.text().await.unwrap_or_default();
                    eprintln!("Mail relay error ({}): {}", status, error_body);
                    return Err("Mail relay returned an error");
                }

                let result = response.json::<SendEmailResponse>().await;
                match result {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        eprintln!("Failed to parse mail relay response: {}", e);
                        Err("Error parsing mail relay response")
                    }
                }
            }
            Err(e) => {
                eprintln!("Request to mail relay failed: {}", e);
                Err("Error sending email")
            }
        }
    }
}
