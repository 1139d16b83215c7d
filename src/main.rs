#[tokio::main]
async fn main() {
    if let Err(e) = odontovision_lib::run().await {
        eprintln!("odontovision: {e}");
        std::process::exit(1);
    }
}
