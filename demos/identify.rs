use pnta_http::{DeviceIdentifiers, Payload, PntaClient, SendOptions, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = PntaClient::from_env()
        .map_err(anyhow::Error::msg)?
        .with_options(SendOptions {
            timeout_ms: 15_000,
            ..SendOptions::default()
        });
    let token = std::env::var("PNTA_DEVICE_TOKEN")?;

    let identifiers = DeviceIdentifiers {
        model: Some("demo".to_owned()),
        system_name: Some(client.platform().to_string()),
        preferred_languages: vec!["en".to_owned()],
        ..DeviceIdentifiers::default()
    };

    let identifier = client
        .identify(&token, &identifiers, &Payload::new())
        .await?;
    println!("identified {identifier}");

    let metadata = Payload::from([("source".to_owned(), Value::text("demo"))]);
    if let Err(err) = client.update_metadata(&identifier, &metadata).await {
        eprintln!("{}: {} ({:?})", err.code(), err.message(), err.details());
        return Err(err.into());
    }
    println!("metadata updated");

    Ok(())
}
