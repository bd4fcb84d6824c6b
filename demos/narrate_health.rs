use chrono::NaiveDate;
use dotenv::dotenv;
use rust_decimal_macros::dec;
use sme_financial_health::llm::{OpenRouterClient, PromptKind};
use sme_financial_health::*;
use std::error::Error;

fn sample_records() -> Vec<FinancialRecord> {
    [
        (1, dec!(120000), dec!(95000), dec!(40000)),
        (2, dec!(110000), dec!(98000), dec!(40000)),
        (3, dec!(135000), dec!(101000), dec!(38000)),
    ]
    .into_iter()
    .filter_map(|(month, revenue, expenses, loans)| {
        let date = NaiveDate::from_ymd_opt(2024, month, 28)?;
        Some(FinancialRecord {
            revenue,
            expenses,
            accounts_receivable: dec!(30000),
            accounts_payable: dec!(24000),
            loan_obligations: loans,
            ..FinancialRecord::empty(date)
        })
    })
    .collect()
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    dotenv().ok();

    let config = NarrationConfig::from_env();
    if !config.has_credential() {
        println!("⚠️  OPENROUTER_API_KEY not set, expect the fallback text\n");
    }
    let language = std::env::args().nth(1).unwrap_or_else(|| "en".to_string());

    let client = OpenRouterClient::new(&config);
    println!("🤖 Narrating with {} ({})...\n", client.model(), language);

    let records = sample_records();
    let metrics = compute_metrics(&records);
    let narrator = Narrator::new(client, &config);

    let narrative = narrator.narrate(&metrics, "retail", language.as_str()).await;
    if narrative.is_fallback() {
        println!("(fallback: {:?})", narrative.fallback);
    }
    println!("{}\n", narrative.text);

    let report =
        ReportAssembler::narrative_report(1, PromptKind::FinancialHealth, &metrics, &narrative)?;
    println!("📝 Stored as:\n{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
