#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    gradesheet_merge_lib::run().await?;
    Ok(())
}
