/// compare banks - rank three offers for a 500M VND home loan
use loan_comparison::{
    compare_offers, BankOffer, ComparisonRecord, EarlyRepaymentFee, LoanTerms, LoanType, Money,
    PaymentConvention, Rate, RateSheet, RateTier, SafeTimeProvider, TimeSource,
};
use chrono::Utc;
use rust_decimal_macros::dec;

fn sheet(tiers: &[(rust_decimal::Decimal, u32, u32)], floating: rust_decimal::Decimal) -> RateSheet {
    RateSheet {
        rate_tiers: tiers
            .iter()
            .map(|&(rate, fixed_months, min_tenure)| RateTier {
                fixed_rate: Rate::from_percent(rate),
                fixed_months,
                min_tenure,
            })
            .collect(),
        floating_rate: Rate::from_percent(floating),
        early_repayment_fees: vec![
            EarlyRepaymentFee { year: 1, fee_rate: Rate::from_percent(dec!(3)) },
            EarlyRepaymentFee { year: 3, fee_rate: Rate::from_percent(dec!(1.5)) },
            EarlyRepaymentFee { year: 5, fee_rate: Rate::from_percent(dec!(0.5)) },
        ],
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== bank comparison ===\n");

    let terms = LoanTerms::new(Money::from_major(500_000_000), 240, PaymentConvention::DecliningBalance)
        .with_early_repayment_year(3);

    let offers = vec![
        BankOffer::new("vcb", "Vietcombank", terms.clone(), sheet(&[(dec!(6.5), 12, 12), (dec!(7.2), 24, 60)], dec!(10)))
            .with_loan_type(LoanType::HomeLoan),
        BankOffer::new("bidv", "BIDV", terms.clone(), sheet(&[(dec!(6.0), 6, 12)], dec!(10.5)))
            .with_loan_type(LoanType::HomeLoan),
        BankOffer::new("tcb", "Techcombank", terms.clone(), sheet(&[(dec!(5.9), 12, 36)], dec!(11)))
            .with_loan_type(LoanType::HomeLoan),
        // no published tiers for this product
        BankOffer::new("shb", "SHB", terms, RateSheet::default()),
    ];

    let report = compare_offers(&offers)?;

    for (rank, result) in report.results().iter().enumerate() {
        println!(
            "{}. {:<12} fixed {} for {} months, total cost {}, fee {}",
            rank + 1,
            result.bank_name,
            result.fixed_rate,
            result.fixed_months,
            result.total_cost,
            result.early_repayment_fee,
        );
    }
    for dropped in report.dropped() {
        println!("skipped {}: {}", dropped.bank_name, dropped.reason);
    }
    println!(
        "\nspread {} ({}%)\n",
        report.cost_spread(),
        report.cost_spread_percent().round_dp(2)
    );

    println!("summary payload");
    println!("---------------");
    println!("{}\n", serde_json::to_string_pretty(&report.summary_payload())?);

    let time = SafeTimeProvider::new(TimeSource::Test(Utc::now()));
    let record = ComparisonRecord::from_result(report.best(), &time);
    println!("record to persist");
    println!("-----------------");
    println!("{}", record.to_json()?);

    Ok(())
}
