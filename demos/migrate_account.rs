//! 계정 마이그레이션 데모
//!
//! 환경 변수로 엔드포인트/인증 정보를 받아 계정 하나를 조회하고
//! 마이그레이션합니다.
//!
//! ```bash
//! PANELTX_HOST=api.example.net \
//! PANELTX_USER=migraweb \
//! PANELTX_PASS=... \
//! cargo run --example migrate_account -- acme web01.example web02.example
//! ```

use paneltx::{ApiClient, ApiConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let host = std::env::var("PANELTX_HOST")?;
    let user = std::env::var("PANELTX_USER")?;
    let pass = std::env::var("PANELTX_PASS")?;

    let mut args = std::env::args().skip(1);
    let account = args.next().ok_or("usage: migrate_account <account> <server> <new_server>")?;
    let server = args.next().ok_or("missing <server>")?;
    let new_server = args.next().ok_or("missing <new_server>")?;

    let client = ApiClient::new(ApiConfig::new(host, user, pass))?;

    let info = client.account_info(&account).await?;
    println!("account info: {info:#?}");

    let result = client.migrate(&account, &server, &new_server).await?;
    println!("migrate result: {result:#?}");

    Ok(())
}
