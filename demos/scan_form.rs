use form_discovery::FormBrowser;

#[tokio::main]
async fn main() -> form_discovery::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://httpbin.org/forms/post".to_string());

    let browser = FormBrowser::builder().headless(true).build().await?;
    let page = browser.new_page(&url).await?;

    let fields = form_discovery::collect_all_form_fields(&page).await?;
    println!("Found {} form fields:", fields.len());
    for field in &fields {
        match &field.options {
            Some(options) => println!(
                "  {} (type={}, required={}) options={:?}",
                field.label, field.field_type, field.is_required, options
            ),
            None => println!(
                "  {} (type={}, required={})",
                field.label, field.field_type, field.is_required
            ),
        }
    }

    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(())
}
