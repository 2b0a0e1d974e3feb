use std::collections::HashMap;

use serde::Serialize;
use tera::{Context, Tera};

use carebill_core::models::claim::{Claim, ClaimStatus};
use carebill_core::models::collections::CollectionsAccount;
use carebill_core::models::patient::Patient;
use carebill_core::models::payment_plan::{PaymentPlan, PlanStatus, round_cents};
use carebill_core::models::settings::PracticeSettings;

use crate::error::ExportError;

pub const DEFAULT_STATEMENT_TEMPLATE: &str = r#"{{ practice_name }}
PATIENT STATEMENT
Statement date: {{ statement_date }}

{{ patient_name }}
{% if patient_address %}{{ patient_address }}
{% endif %}
Claims
{% if lines %}{% for line in lines -%}
  {{ line.claim_number }}  {% if line.service_date %}{{ line.service_date }}{% else %}-{% endif %}  {{ line.status }}  ${{ line.amount | money }}
{% endfor %}{% else %}  No claims on file.
{% endif %}
{% for plan in plans -%}
Payment plan: ${{ plan.remaining | money }} remaining{% if plan.next_due_date %}, next ${{ plan.next_due_amount | money }} due {{ plan.next_due_date }}{% endif %}
{% endfor %}
Balance due: ${{ balance_due | money }}
{% if footer %}
{{ footer }}
{% endif %}"#;

pub const DEFAULT_COLLECTIONS_NOTICE_TEMPLATE: &str = r#"{{ practice_name }}
{{ notice_date }}

Dear {{ patient_name }},

Our records show a balance of ${{ balance | money }} that was due on {{ due_date }} and is now {{ days_past_due }} days past due ({{ stage }}).
{% if agency %}
This account has been referred to {{ agency }}.
{% endif %}
Please contact our billing office to arrange payment or a payment plan.
{% if footer %}
{{ footer }}
{% endif %}"#;

/// `{{ amount | money }}` renders a dollar amount with two decimals.
fn money(value: &tera::Value, _args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
    let amount = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg(format!("money filter expects a number, got {value}")))?;
    Ok(tera::Value::String(format!("{amount:.2}")))
}

fn engine(template_name: &str, template_content: &str) -> Result<Tera, ExportError> {
    let mut tera = Tera::default();
    tera.register_filter("money", money);
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;
    Ok(tera)
}

/// Parse a template without rendering it.
pub fn check_template(template_content: &str) -> Result<(), ExportError> {
    engine("check", template_content).map(|_| ())
}

/// Render a Tera template with any serializable context.
///
/// The `template_content` is the raw template string (Jinja2 syntax).
pub fn render_template<C: Serialize>(
    template_name: &str,
    template_content: &str,
    context: &C,
) -> Result<String, ExportError> {
    let tera = engine(template_name, template_content)?;

    let value = serde_json::to_value(context)?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    Ok(rendered)
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementLine {
    pub claim_number: String,
    pub service_date: Option<jiff::civil::Date>,
    pub status: ClaimStatus,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementPlan {
    pub remaining: f64,
    pub next_due_date: Option<jiff::civil::Date>,
    pub next_due_amount: Option<f64>,
}

/// Everything a statement template can reference.
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub practice_name: String,
    pub footer: String,
    pub statement_date: jiff::civil::Date,
    pub patient_name: String,
    pub patient_address: String,
    pub lines: Vec<StatementLine>,
    pub plans: Vec<StatementPlan>,
    pub balance_due: f64,
}

impl Statement {
    /// Denied claims are left off; active plans are summarized.
    pub fn build(
        settings: &PracticeSettings,
        patient: &Patient,
        claims: &[Claim],
        plans: &[PaymentPlan],
        statement_date: jiff::civil::Date,
    ) -> Self {
        let mut lines: Vec<StatementLine> = claims
            .iter()
            .filter(|c| c.patient.id == patient.id && c.status != ClaimStatus::Denied)
            .map(|c| StatementLine {
                claim_number: c.claim_number.clone(),
                service_date: c.service_date,
                status: c.status,
                amount: round_cents(c.total_amount),
            })
            .collect();
        lines.sort_by(|a, b| b.service_date.cmp(&a.service_date));

        let plans = plans
            .iter()
            .filter(|p| p.patient_id == patient.id && p.status == PlanStatus::Active)
            .map(|p| {
                let next = p.next_due();
                StatementPlan {
                    remaining: p.remaining_balance(),
                    next_due_date: next.map(|i| i.due_date),
                    next_due_amount: next.map(|i| i.amount),
                }
            })
            .collect();

        Self {
            practice_name: settings.practice_name.clone(),
            footer: settings.statement_footer.clone(),
            statement_date,
            patient_name: patient.full_name(),
            patient_address: patient.address.one_line(),
            lines,
            plans,
            balance_due: round_cents(patient.balance),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionsNotice {
    pub practice_name: String,
    pub footer: String,
    pub notice_date: jiff::civil::Date,
    pub patient_name: String,
    pub balance: f64,
    pub due_date: jiff::civil::Date,
    pub days_past_due: i64,
    pub stage: &'static str,
    pub agency: Option<String>,
}

impl CollectionsNotice {
    pub fn build(
        settings: &PracticeSettings,
        account: &CollectionsAccount,
        notice_date: jiff::civil::Date,
    ) -> Self {
        Self {
            practice_name: settings.practice_name.clone(),
            footer: settings.statement_footer.clone(),
            notice_date,
            patient_name: account.patient_name.clone(),
            balance: round_cents(account.current_balance),
            due_date: account.due_date,
            days_past_due: account.days_past_due(notice_date),
            stage: account.stage.label(),
            agency: account.agency.clone(),
        }
    }
}

/// Render with the stored override when there is one, else the built-in default.
pub fn render_statement(
    statement: &Statement,
    template_override: Option<&str>,
) -> Result<String, ExportError> {
    render_template(
        "statement",
        template_override.unwrap_or(DEFAULT_STATEMENT_TEMPLATE),
        statement,
    )
}

pub fn render_collections_notice(
    notice: &CollectionsNotice,
    template_override: Option<&str>,
) -> Result<String, ExportError> {
    render_template(
        "collections-notice",
        template_override.unwrap_or(DEFAULT_COLLECTIONS_NOTICE_TEMPLATE),
        notice,
    )
}
