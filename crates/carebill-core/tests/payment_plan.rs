use jiff::civil::date;
use uuid::Uuid;

use carebill_core::error::PlanError;
use carebill_core::models::payment_plan::{PaymentPlan, PlanStatus, PlanTerms};

fn terms(total: f64, down: f64, discount: f64, count: u32) -> PlanTerms {
    PlanTerms {
        total_amount: total,
        down_payment: down,
        discount_percent: discount,
        installment_count: count,
        start_date: date(2025, 1, 15),
    }
}

fn now() -> jiff::Timestamp {
    "2025-01-10T12:00:00Z".parse().unwrap()
}

#[test]
fn installments_sum_to_financed_amount() {
    let schedule = terms(100.0, 0.0, 0.0, 3).generate_installments().unwrap();
    let amounts: Vec<f64> = schedule.iter().map(|i| i.amount).collect();
    assert_eq!(amounts, vec![33.33, 33.33, 33.34]);
    let sum: f64 = amounts.iter().sum();
    assert!((sum - 100.0).abs() < 1e-9);
}

#[test]
fn tiny_balances_never_produce_negative_installments() {
    for (total, count) in [(0.05, 10), (1.0, 150), (10.01, 7), (0.0, 4)] {
        let schedule = terms(total, 0.0, 0.0, count).generate_installments().unwrap();
        assert_eq!(schedule.len(), count as usize);
        assert!(
            schedule.iter().all(|i| i.amount >= 0.0),
            "{total} over {count}: {schedule:?}"
        );
        let cents: i64 = schedule.iter().map(|i| (i.amount * 100.0).round() as i64).sum();
        assert_eq!(cents, (total * 100.0).round() as i64);
    }

    let schedule = terms(0.05, 0.0, 0.0, 10).generate_installments().unwrap();
    assert_eq!(schedule[0].amount, 0.0);
    assert_eq!(schedule[9].amount, 0.05);
}

#[test]
fn due_dates_step_by_one_month() {
    let schedule = terms(600.0, 0.0, 0.0, 3).generate_installments().unwrap();
    let dates: Vec<_> = schedule.iter().map(|i| i.due_date).collect();
    assert_eq!(
        dates,
        vec![date(2025, 1, 15), date(2025, 2, 15), date(2025, 3, 15)]
    );
    assert_eq!(schedule[2].sequence, 3);
}

#[test]
fn month_end_start_dates_clamp_without_drifting() {
    let mut t = terms(300.0, 0.0, 0.0, 3);
    t.start_date = date(2025, 1, 31);
    let dates: Vec<_> = t
        .generate_installments()
        .unwrap()
        .into_iter()
        .map(|i| i.due_date)
        .collect();
    assert_eq!(
        dates,
        vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)]
    );
}

#[test]
fn discount_and_down_payment_reduce_financed_amount() {
    let t = terms(1000.0, 100.0, 10.0, 4);
    assert_eq!(t.discounted_total(), 900.0);
    assert_eq!(t.financed_amount().unwrap(), 800.0);
    let schedule = t.generate_installments().unwrap();
    assert!(schedule.iter().all(|i| i.amount == 200.0));
}

#[test]
fn discount_is_capped() {
    let t = terms(1000.0, 0.0, 50.0, 1).with_discount_cap(20.0);
    assert_eq!(t.discount_percent, 20.0);
    assert_eq!(t.discounted_total(), 800.0);
}

#[test]
fn invalid_terms_are_rejected() {
    assert_eq!(
        terms(100.0, 0.0, 0.0, 0).generate_installments(),
        Err(PlanError::NoInstallments)
    );
    assert_eq!(
        terms(100.0, 0.0, 120.0, 2).generate_installments(),
        Err(PlanError::InvalidDiscount(120.0))
    );
    assert!(matches!(
        terms(100.0, 150.0, 0.0, 2).generate_installments(),
        Err(PlanError::DownPaymentExceedsTotal { .. })
    ));
    assert_eq!(
        terms(-5.0, 0.0, 0.0, 2).generate_installments(),
        Err(PlanError::NegativeAmount {
            field: "total_amount"
        })
    );
}

#[test]
fn paying_every_installment_completes_plan() {
    let mut plan = PaymentPlan::new(Uuid::new_v4(), terms(90.0, 0.0, 0.0, 2), now()).unwrap();
    assert_eq!(plan.remaining_balance(), 90.0);

    let first = plan.record_payment(now()).unwrap();
    assert_eq!(first.sequence, 1);
    assert_eq!(plan.status, PlanStatus::Active);
    assert_eq!(plan.next_due().unwrap().sequence, 2);

    plan.record_payment(now()).unwrap();
    assert_eq!(plan.status, PlanStatus::Completed);
    assert_eq!(plan.remaining_balance(), 0.0);
    assert_eq!(plan.record_payment(now()), Err(PlanError::NotActive));
}

#[test]
fn missed_installments_default_the_plan() {
    let mut plan = PaymentPlan::new(Uuid::new_v4(), terms(300.0, 0.0, 0.0, 3), now()).unwrap();
    assert!(!plan.check_default(date(2025, 2, 1), 2, now()));
    assert_eq!(plan.overdue(date(2025, 2, 16)).len(), 2);
    assert!(plan.check_default(date(2025, 2, 16), 2, now()));
    assert_eq!(plan.status, PlanStatus::Defaulted);
}

#[test]
fn cancelled_plan_rejects_payments() {
    let mut plan = PaymentPlan::new(Uuid::new_v4(), terms(300.0, 0.0, 0.0, 3), now()).unwrap();
    plan.cancel(now()).unwrap();
    assert_eq!(plan.record_payment(now()), Err(PlanError::NotActive));
}
