use std::time::Duration;

use reqwest::Client;

const APP_USER_AGENT: &str = "modhaven/0.1.0";

pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(Duration::from_secs(120))
        .build()
}
