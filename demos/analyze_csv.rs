use dotenv::dotenv;
use serde_json::Value;
use sme_financial_health::*;
use std::env;

const SAMPLE_CSV: &str = "\
Record Date,Revenue,Expenses,Accounts Receivable,Accounts Payable,Inventory Value,Loan Obligations,Tax Paid
2024-01-31,\"1,20,000\",95000,30000,22000,15000,40000,21600
2024-02-29,110000,98000,28000,26000,,40000,19800
2024-03-31,135000,101000,35000,24000,18000,38000,20000
2024-04-30,128000,99000,31000,27000,16000,36000,23040
";

fn read_rows(reader: impl std::io::Read) -> anyhow::Result<Vec<RawRow>> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if env::args().nth(1).as_deref() == Some("--schema") {
        println!("{}", serde_json::to_string_pretty(&record_schema())?);
        return Ok(());
    }

    let industry = env::var("INDUSTRY").unwrap_or_else(|_| "retail".to_string());
    let rows = match env::args().nth(1) {
        Some(path) => {
            println!("📂 Reading {}", path);
            read_rows(std::fs::File::open(path)?)?
        }
        None => {
            println!("📂 No CSV given, using the bundled sample quarter");
            read_rows(SAMPLE_CSV.as_bytes())?
        }
    };

    let records = normalize(&rows)?;
    println!("✅ Normalized {} records\n", records.len());

    let analyzer = match env::var("BENCHMARKS_PATH") {
        Ok(path) => HealthAnalyzer::new(BenchmarkTable::from_path(path)?),
        Err(_) => HealthAnalyzer::default(),
    };
    let industries: Vec<&str> = analyzer.benchmarks().industries().collect();
    println!("🏭 Benchmarks loaded for: {}\n", industries.join(", "));

    let outcome = analyzer.analyze(&records, &industry);
    let metrics = &outcome.metrics;

    println!("📊 Metrics");
    println!("  Revenue:          {}", format_currency(metrics.total_revenue));
    println!("  Expenses:         {}", format_currency(metrics.total_expenses));
    println!("  Profit:           {}", format_currency(metrics.profit));
    println!("  Profit margin:    {}", metrics.profit_margin);
    println!("  Working capital:  {}", format_currency(metrics.working_capital));
    println!("  Debt to revenue:  {}", metrics.debt_to_revenue);

    println!("\n⚠️  Risk: {}", outcome.risk.risk_level);
    for reason in &outcome.risk.reasons {
        println!("  - {}", reason);
    }
    println!(
        "💳 Credit score: {} (band: {})",
        outcome.credit_score, outcome.credit_risk_band
    );

    println!("\n🏭 Benchmark vs '{}':", industry);
    println!("  {}", serde_json::to_string(&outcome.benchmark)?);

    if !outcome.working_capital_suggestions.is_empty() {
        println!("\n💡 Suggestions");
        for (topic, advice) in &outcome.working_capital_suggestions {
            println!("  [{:?}] {}", topic, advice);
        }
    }

    let compliance = analyzer.assess_compliance(&records);
    println!("\n🧾 GST: {:?} ({})", compliance.status, compliance.note);

    let forecast = analyzer.forecast(&records, DEFAULT_FORECAST_MONTHS);
    if forecast.is_empty() {
        println!("\n📈 Not enough history to forecast");
    } else {
        println!("\n📈 Forecast");
        for point in forecast.points() {
            println!("  {}: {}", point.label(), format_currency(point.revenue));
        }
    }

    let duplicates = detect_duplicates(&records);
    if !duplicates.is_empty() {
        println!("\n🔁 Duplicate rows at {:?}", duplicates);
    }

    let report = ReportAssembler::analysis_report(1, &outcome)?;
    println!("\n📝 Report payload:\n{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
