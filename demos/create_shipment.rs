use myparcel_client::{
    Address, Carrier, Client, DeliveryType, Insurance, Options, PackageType, Shipment,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("myparcel_client=debug")),
        )
        .init();

    let api_key = std::env::var("MYPARCEL_API_KEY")?;
    let client = Client::builder(api_key)
        .timeout(Duration::from_secs(30))
        .build()?;

    let tomorrow = chrono::Local::now() + chrono::Duration::days(1);
    let recipient = Address::new("NL", "Amsterdam", "Damrak", "Piet Jansen")
        .number("1")
        .postal_code("1012LG")
        .email("piet@example.com");

    let shipment = Shipment::new(recipient, Carrier::PostNl)
        .reference("demo-order-1")
        .options(Options {
            delivery_type: Some(DeliveryType::Evening),
            delivery_date: myparcel_client::ApiTime::from_datetime(&tomorrow),
            signature: true,
            insurance: Some(Insurance::eur(50_000)),
            label_description: Some("Demo order".to_string()),
            ..Options::new(PackageType::Package)
        });

    let id = client.create_shipment(&shipment).await?;
    println!("Created shipment {id}");

    let found = client.get_shipment(id).await?;
    for shipment in &found.shipments {
        println!(
            "{:?}: barcode {:?}, created {}",
            shipment.id, shipment.barcode, shipment.created
        );
    }

    Ok(())
}
