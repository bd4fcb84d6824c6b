// Prompt templates for narrating pre-computed metrics.

use serde_json::Value;

pub const SYSTEM_FINANCIAL_ANALYST: &str = r#"
You are a senior financial analyst specializing in Small and Medium Enterprises (SMEs).
Your task is to interpret pre-calculated financial metrics and provide:
- Clear explanations for non-finance business owners
- Actionable, realistic recommendations
- Risk-aware insights (no speculation)

Rules:
- DO NOT invent numbers
- DO NOT perform calculations
- Use simple language
- Be conservative and compliant
"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    /// Resolves a language code; anything unsupported falls back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "hi" => Language::Hindi,
            _ => Language::English,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Language::English => "Respond in clear, simple English.",
            Language::Hindi => "Respond in simple Hindi suitable for Indian business owners.",
        }
    }
}

impl From<&str> for Language {
    fn from(code: &str) -> Self {
        Language::from_code(code)
    }
}

/// Appends the language directive to a system prompt.
pub fn apply_language(system_prompt: &str, language: Language) -> String {
    format!("{}\n\n{}", system_prompt, language.instruction())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    FinancialHealth,
    Creditworthiness,
    Investor,
}

fn render_metrics(metrics: &Value) -> String {
    serde_json::to_string_pretty(metrics).unwrap_or_else(|_| metrics.to_string())
}

pub fn financial_health_prompt(metrics: &Value, industry: &str, language: Language) -> String {
    format!(
        r#"
Industry: {industry}
Language: {language}

Financial Metrics (already calculated):
{metrics}

Tasks:
1. Assess overall financial health
2. Identify key risks (cash flow, debt, compliance)
3. Suggest cost optimization opportunities
4. Recommend suitable financial products (bank/NBFC)
5. Keep advice SME-friendly and actionable
"#,
        industry = industry,
        language = language.code(),
        metrics = render_metrics(metrics),
    )
}

pub fn creditworthiness_prompt(metrics: &Value, industry: &str) -> String {
    format!(
        r#"
Industry: {industry}

Credit Metrics:
{metrics}

Tasks:
1. Evaluate creditworthiness
2. Identify red flags for lenders
3. Suggest steps to improve loan eligibility
"#,
        industry = industry,
        metrics = render_metrics(metrics),
    )
}

pub fn investor_report_prompt(metrics: &Value, industry: &str) -> String {
    format!(
        r#"
Industry: {industry}

Metrics:
{metrics}

Tasks:
1. Write an investor-ready summary
2. Highlight growth, stability, and risks
3. Keep tone professional and factual
"#,
        industry = industry,
        metrics = render_metrics(metrics),
    )
}

/// Builds the (system, user) prompt pair for a narration request.
pub fn build_prompts(
    kind: PromptKind,
    metrics: &Value,
    industry: &str,
    language: Language,
) -> (String, String) {
    let system = apply_language(SYSTEM_FINANCIAL_ANALYST, language);
    let user = match kind {
        PromptKind::FinancialHealth => financial_health_prompt(metrics, industry, language),
        PromptKind::Creditworthiness => creditworthiness_prompt(metrics, industry),
        PromptKind::Investor => investor_report_prompt(metrics, industry),
    };
    (system, user)
}
