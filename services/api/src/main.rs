use talent_review_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("talent-review-api: {err}");
        std::process::exit(1);
    }
}
