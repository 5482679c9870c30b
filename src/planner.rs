//! Scenario aggregation: per-item rate resolution, funding ages, deferral,
//! present-value discounting and the grand total

use rayon::prelude::*;
use serde::Serialize;

use crate::assumptions::{GlobalAssumptions, RateSet, ResolvedRates, TaxSchedule};
use crate::plan::{MedicalBuffer, PlanItem, Scenario};
use crate::projection::{AssetBreakdown, CapitalResult, ProjectionRow};
use crate::schedule::{AssetPlan, IncomeStream, RecurringOutlay};

/// Calendar year treated as "today" for age arithmetic
pub const REFERENCE_YEAR: i32 = 2026;

/// Vehicles are always projected over a fixed horizon
const VEHICLE_HORIZON_YEARS: u32 = 30;

/// Trade-in fraction assumed when a vehicle item states none
const DEFAULT_TRADE_IN_FRACTION: f64 = 0.3;

/// One funded item: capital figures, resolved rates and the projected rows
#[derive(Debug, Clone, Serialize)]
pub struct ItemResult {
    pub title: String,
    /// Capital required today, discounted back from the funding age
    pub present_value_capital: f64,
    /// Capital required at the funding age
    pub capital_at_fund_age: f64,
    pub fund_age: i32,
    pub rates: ResolvedRates,
    pub rows: Vec<ProjectionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<AssetBreakdown>,
}

/// Full scenario output: per-item results plus the present-value total
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutcome {
    pub items: Vec<ItemResult>,
    pub total_capital: f64,
}

/// Evaluate every item in the scenario and sum the present-value capitals.
///
/// Items are independent and evaluated in parallel; result order follows
/// document order (incomes, cars, assets, travel, medical). Items with a
/// non-positive duration or magnitude are skipped.
pub fn process_scenario(scenario: &Scenario) -> PlanOutcome {
    let p1_current_age = REFERENCE_YEAR - scenario.profile.p1_birth_year();
    let p2_current_age = REFERENCE_YEAR - scenario.profile.p2_birth_year();

    let ctx = PlanContext {
        assumptions: &scenario.assumptions,
        universal_fund_age: scenario.universal_fund_age,
        p1_current_age,
        p2_current_age,
    };

    let mut work: Vec<WorkItem> = Vec::new();
    work.extend(scenario.incomes.iter().map(WorkItem::Income));
    work.extend(scenario.cars.iter().map(WorkItem::Vehicle));
    work.extend(scenario.assets.iter().map(WorkItem::Asset));
    work.extend(scenario.travel.iter().map(WorkItem::Travel));
    work.push(WorkItem::Medical(&scenario.medical));

    let items: Vec<ItemResult> = work
        .par_iter()
        .filter_map(|item| ctx.evaluate(item))
        .collect();

    let total_capital = items.iter().map(|r| r.present_value_capital).sum();
    log::debug!(
        "evaluated {} of {} items, total capital {:.2}",
        items.len(),
        work.len(),
        total_capital
    );

    PlanOutcome {
        items,
        total_capital,
    }
}

enum WorkItem<'a> {
    Income(&'a PlanItem),
    Vehicle(&'a PlanItem),
    Asset(&'a PlanItem),
    Travel(&'a PlanItem),
    Medical(&'a MedicalBuffer),
}

struct PlanContext<'a> {
    assumptions: &'a GlobalAssumptions,
    universal_fund_age: Option<i32>,
    p1_current_age: i32,
    p2_current_age: i32,
}

impl PlanContext<'_> {
    fn evaluate(&self, item: &WorkItem) -> Option<ItemResult> {
        match item {
            WorkItem::Income(item) => self.income_stream(item),
            WorkItem::Vehicle(item) => self.vehicle(item),
            WorkItem::Asset(item) => self.asset(item),
            WorkItem::Travel(item) => self.travel(item),
            WorkItem::Medical(med) => self.medical(med),
        }
    }

    /// The universal funding age overrides the item's own; either is clamped
    /// to never precede the client's current age
    fn fund_age(&self, item_funding_start: Option<i32>) -> i32 {
        self.universal_fund_age
            .or(item_funding_start)
            .unwrap_or(self.p1_current_age)
            .max(self.p1_current_age)
    }

    fn fund_year(&self, fund_age: i32) -> i32 {
        REFERENCE_YEAR + (fund_age - self.p1_current_age)
    }

    fn p2_age_at(&self, fund_age: i32) -> i32 {
        self.p2_current_age + (fund_age - self.p1_current_age)
    }

    fn deferral_years(&self, start_age: i32, fund_age: i32) -> u32 {
        (start_age - fund_age).max(0) as u32
    }

    /// Inflate a today-priced amount forward to the item's start age using
    /// the global inflation rate
    fn inflate_to_start(&self, amount: f64, start_age: i32) -> f64 {
        let years = start_age - self.p1_current_age;
        if years > 0 {
            amount * (1.0 + self.assumptions.inflation / 100.0).powi(years)
        } else {
            amount
        }
    }

    fn global_inflation(&self) -> f64 {
        self.assumptions.inflation / 100.0
    }

    /// Discount capital at the funding age back to today at the item's
    /// resolved growth rate
    fn pv_to_today(&self, capital_at_fund_age: f64, growth_pct: f64, fund_age: i32) -> f64 {
        let years_back = fund_age - self.p1_current_age;
        if years_back > 0 {
            capital_at_fund_age / (1.0 + growth_pct / 100.0).powi(years_back)
        } else {
            capital_at_fund_age
        }
    }

    fn rate_set(&self, rates: &ResolvedRates, fund_age: i32, total_years: usize) -> RateSet {
        let tax = TaxSchedule::with_tax_free_age(
            rates.tax_rate / 100.0,
            fund_age,
            total_years,
            self.assumptions.tax_free_age,
        );
        rates.to_rate_set(tax)
    }

    /// Left-pad the rows with zero-balance years from the current age to the
    /// funding age, so every item shares the same timeline origin
    fn pad_to_current_age(
        &self,
        rows: Vec<ProjectionRow>,
        breakdown: Option<AssetBreakdown>,
        fund_age: i32,
    ) -> (Vec<ProjectionRow>, Option<AssetBreakdown>) {
        let n = (fund_age - self.p1_current_age).max(0) as usize;
        if n == 0 {
            return (rows, breakdown);
        }

        let mut padded = Vec::with_capacity(n + rows.len());
        for i in 0..n as i32 {
            padded.push(ProjectionRow::zero(
                REFERENCE_YEAR + i,
                Some(self.p1_current_age + i),
                Some(self.p2_current_age + i),
            ));
        }
        padded.extend(rows);

        let breakdown = breakdown.map(|mut b| {
            b.pad_front(n);
            b
        });

        (padded, breakdown)
    }

    fn finish(
        &self,
        title: String,
        rates: ResolvedRates,
        fund_age: i32,
        result: CapitalResult,
    ) -> ItemResult {
        let present_value =
            self.pv_to_today(result.starting_capital, rates.growth_return, fund_age);
        let (rows, breakdown) = self.pad_to_current_age(result.rows, result.breakdown, fund_age);

        ItemResult {
            title,
            present_value_capital: present_value,
            capital_at_fund_age: result.starting_capital,
            fund_age,
            rates,
            rows,
            breakdown,
        }
    }

    fn income_stream(&self, item: &PlanItem) -> Option<ItemResult> {
        let duration = item.end - item.start;
        if duration <= 0 || item.income <= 0.0 {
            return None;
        }

        let rates = ResolvedRates::resolve(
            self.assumptions,
            item.portfolio,
            &item.rate_overrides(),
            duration,
        );
        let fund_age = self.fund_age(item.funding_start);
        let defer = self.deferral_years(item.start, fund_age);
        let total_years = defer as usize + duration as usize;

        let stream = IncomeStream {
            start_year: self.fund_year(fund_age),
            duration_years: duration as u32,
            defer_years: defer,
            initial_drawdown: self.inflate_to_start(item.income, item.start),
            inflation: self.global_inflation(),
            p1_age: fund_age,
            p2_age: self.p2_age_at(fund_age),
        };
        let result = stream.compute(&self.rate_set(&rates, fund_age, total_years), None);

        Some(self.finish(format!("Income Stream: {}", item.name), rates, fund_age, result))
    }

    fn vehicle(&self, item: &PlanItem) -> Option<ItemResult> {
        if item.cost <= 0.0 {
            return None;
        }
        let duration = VEHICLE_HORIZON_YEARS as i32;

        let rates = ResolvedRates::resolve(
            self.assumptions,
            item.portfolio,
            &item.rate_overrides(),
            duration,
        );
        let fund_age = self.fund_age(item.funding_start);
        let defer = self.deferral_years(item.start, fund_age);
        let total_years = defer as usize + duration as usize;

        let inflated_cost = self.inflate_to_start(item.cost, item.start);
        // A stated trade-in wins; zero falls back to a fraction of the
        // inflated purchase price
        let trade_in = if item.tradein != 0.0 {
            item.tradein
        } else {
            inflated_cost * DEFAULT_TRADE_IN_FRACTION
        };

        let plan = AssetPlan {
            start_year: self.fund_year(fund_age),
            duration_years: VEHICLE_HORIZON_YEARS,
            defer_years: defer,
            purchase_value: inflated_cost,
            replacement_cycle: item.cycle,
            annual_holding_cost: item.holding,
            trade_in_value: trade_in,
            inflation: if item.apply_inflation {
                self.global_inflation()
            } else {
                0.0
            },
            sell_at_end: false,
            p1_age: fund_age,
            p2_age: self.p2_age_at(fund_age),
        };
        let result = plan.compute(&self.rate_set(&rates, fund_age, total_years), None);

        Some(self.finish(format!("Vehicle: {}", item.name), rates, fund_age, result))
    }

    fn asset(&self, item: &PlanItem) -> Option<ItemResult> {
        let duration = item.end - item.start;
        if duration <= 0 || item.cost <= 0.0 {
            return None;
        }

        let rates = ResolvedRates::resolve(
            self.assumptions,
            item.portfolio,
            &item.rate_overrides(),
            duration,
        );
        let fund_age = self.fund_age(item.funding_start);
        let defer = self.deferral_years(item.start, fund_age);
        let total_years = defer as usize + duration as usize;

        let plan = AssetPlan {
            start_year: self.fund_year(fund_age),
            duration_years: duration as u32,
            defer_years: defer,
            purchase_value: self.inflate_to_start(item.cost, item.start),
            replacement_cycle: 0,
            annual_holding_cost: item.holding,
            trade_in_value: item.resale,
            inflation: if item.apply_inflation {
                self.global_inflation()
            } else {
                0.0
            },
            sell_at_end: true,
            p1_age: fund_age,
            p2_age: self.p2_age_at(fund_age),
        };
        let result = plan.compute(&self.rate_set(&rates, fund_age, total_years), None);

        Some(self.finish(format!("Asset: {}", item.name), rates, fund_age, result))
    }

    fn travel(&self, item: &PlanItem) -> Option<ItemResult> {
        let duration = item.end - item.start;
        if duration <= 0 || item.cost <= 0.0 {
            return None;
        }

        let rates = ResolvedRates::resolve(
            self.assumptions,
            item.portfolio,
            &item.rate_overrides(),
            duration,
        );
        let fund_age = self.fund_age(item.funding_start);
        let defer = self.deferral_years(item.start, fund_age);
        let total_years = defer as usize + duration as usize;

        let outlay = RecurringOutlay {
            start_year: self.fund_year(fund_age),
            duration_years: duration as u32,
            defer_years: defer,
            base_cost: self.inflate_to_start(item.cost, item.start),
            frequency_years: 1,
            inflation: self.global_inflation(),
            p1_age: Some(fund_age),
            p2_age: Some(self.p2_age_at(fund_age)),
        };
        let result = outlay.compute(&self.rate_set(&rates, fund_age, total_years), None);

        Some(self.finish(format!("Travel: {}", item.name), rates, fund_age, result))
    }

    fn medical(&self, med: &MedicalBuffer) -> Option<ItemResult> {
        let duration = med.end - med.start;
        if duration <= 0 || med.cost <= 0.0 {
            return None;
        }

        let rates = ResolvedRates::resolve(
            self.assumptions,
            med.portfolio,
            &med.rate_overrides(),
            duration,
        );
        let fund_age = self.fund_age(med.funding_start);
        let defer = self.deferral_years(med.start, fund_age);
        let total_years = defer as usize + duration as usize;

        let outlay = RecurringOutlay {
            start_year: self.fund_year(fund_age),
            duration_years: duration as u32,
            defer_years: defer,
            base_cost: self.inflate_to_start(med.cost, med.start),
            frequency_years: 1,
            inflation: self.global_inflation(),
            p1_age: Some(fund_age),
            p2_age: Some(self.p2_age_at(fund_age)),
        };
        let result = outlay.compute(&self.rate_set(&rates, fund_age, total_years), None);

        Some(self.finish("Medical Buffer".to_string(), rates, fund_age, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::PortfolioPreset;
    use crate::plan::HouseholdProfile;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // P1 is 60 and P2 is 57 in the reference year
    fn base_scenario() -> Scenario {
        Scenario {
            profile: HouseholdProfile {
                p1_name: "Alex".to_string(),
                p1_dob: date(1966, 4, 12),
                p2_name: "Sam".to_string(),
                p2_dob: Some(date(1969, 9, 30)),
            },
            assumptions: GlobalAssumptions {
                income_return: 3.5,
                growth_return: 4.5,
                tax_rate: 15.0,
                inflation: 3.0,
                fee_load: 1.1,
                tax_free_age: None,
            },
            incomes: Vec::new(),
            cars: Vec::new(),
            assets: Vec::new(),
            travel: Vec::new(),
            medical: MedicalBuffer::default(),
            universal_fund_age: None,
        }
    }

    fn income_item(start: i32, end: i32, income: f64) -> PlanItem {
        PlanItem {
            name: "Retirement".to_string(),
            income,
            start,
            end,
            cost: 0.0,
            cycle: 0,
            holding: 0.0,
            resale: 0.0,
            tradein: 0.0,
            funding_start: None,
            apply_inflation: true,
            portfolio: None,
            income_return: None,
            growth_return: None,
            tax_rate: None,
            fee_load: None,
        }
    }

    #[test]
    fn test_income_item_without_deferral() {
        let mut scenario = base_scenario();
        scenario.incomes.push(income_item(60, 85, 80_000.0));

        let outcome = process_scenario(&scenario);

        assert_eq!(outcome.items.len(), 1);
        let item = &outcome.items[0];
        assert_eq!(item.title, "Income Stream: Retirement");
        assert_eq!(item.fund_age, 60);
        // Funding from the current age: nothing to discount or pad
        assert_eq!(item.present_value_capital, item.capital_at_fund_age);
        assert_eq!(item.rows.len(), 25);
        assert_eq!(item.rows[0].year, REFERENCE_YEAR);
        assert_relative_eq!(item.rows[0].drawdown, 80_000.0, epsilon = 1e-6);
        // 25-year duration auto-selects the growth preset
        assert_eq!(item.rates.portfolio, PortfolioPreset::Growth);
        assert_relative_eq!(outcome.total_capital, item.present_value_capital);
    }

    #[test]
    fn test_future_start_inflates_and_defers() {
        let mut scenario = base_scenario();
        scenario.incomes.push(income_item(65, 85, 80_000.0));

        let outcome = process_scenario(&scenario);
        let item = &outcome.items[0];

        // Fund age stays at the current age, so the first five years defer
        assert_eq!(item.fund_age, 60);
        assert_eq!(item.rows.len(), 25);
        for row in &item.rows[..5] {
            assert_eq!(row.drawdown, 0.0);
        }
        // The nominal amount is inflated from age 60 to the start age
        assert_relative_eq!(
            item.rows[5].drawdown,
            80_000.0 * 1.03f64.powi(5),
            epsilon = 1.0
        );
    }

    #[test]
    fn test_universal_fund_age_pads_and_discounts() {
        let mut scenario = base_scenario();
        scenario.incomes.push(income_item(65, 85, 80_000.0));
        scenario.universal_fund_age = Some(63);

        let outcome = process_scenario(&scenario);
        let item = &outcome.items[0];

        assert_eq!(item.fund_age, 63);
        // Three zero rows from age 60 to 63, then 2 deferral + 20 active
        assert_eq!(item.rows.len(), 25);
        assert_eq!(item.rows[0].year, REFERENCE_YEAR);
        assert_eq!(item.rows[0].p1_age, Some(60));
        assert_eq!(item.rows[0].closing_balance, 0.0);
        assert_eq!(item.rows[2].p1_age, Some(62));
        assert_eq!(item.rows[3].year, REFERENCE_YEAR + 3);
        assert_relative_eq!(item.rows[3].opening_balance, item.capital_at_fund_age);

        // PV discounts three years at the resolved growth rate
        let gr = item.rates.growth_return;
        assert_relative_eq!(
            item.present_value_capital,
            item.capital_at_fund_age / (1.0 + gr / 100.0).powi(3),
            epsilon = 1e-6
        );
        assert!(item.present_value_capital < item.capital_at_fund_age);
    }

    #[test]
    fn test_fund_age_clamped_to_current_age() {
        let mut scenario = base_scenario();
        let mut item = income_item(60, 80, 50_000.0);
        item.funding_start = Some(55);
        scenario.incomes.push(item);

        let outcome = process_scenario(&scenario);
        assert_eq!(outcome.items[0].fund_age, 60);
    }

    #[test]
    fn test_tax_free_age_zeroes_late_rows() {
        let mut scenario = base_scenario();
        scenario.assumptions.tax_free_age = Some(65);
        scenario.incomes.push(income_item(60, 80, 50_000.0));

        let outcome = process_scenario(&scenario);
        let rows = &outcome.items[0].rows;

        for row in rows {
            let age = row.p1_age.unwrap();
            if age >= 65 {
                assert_eq!(row.tax, 0.0, "age {} should be untaxed", age);
            } else {
                assert!(row.tax > 0.0, "age {} should be taxed", age);
            }
        }
    }

    #[test]
    fn test_vehicle_defaults_trade_in_fraction() {
        let mut scenario = base_scenario();
        scenario.cars.push(PlanItem {
            name: "Family car".to_string(),
            cost: 50_000.0,
            cycle: 10,
            holding: 3_300.0,
            apply_inflation: false,
            ..income_item(60, 0, 0.0)
        });

        let outcome = process_scenario(&scenario);
        let item = &outcome.items[0];

        assert_eq!(item.title, "Vehicle: Family car");
        assert_eq!(item.rows.len(), 30);
        let breakdown = item.breakdown.as_ref().unwrap();
        assert_relative_eq!(breakdown.purchase_costs[0], 50_000.0, epsilon = 1e-6);
        // No stated trade-in and no inflation: replacements credit 30% of cost
        assert_relative_eq!(breakdown.trade_in_values[10], 15_000.0, epsilon = 1e-6);
        assert_relative_eq!(breakdown.trade_in_values[20], 15_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_asset_sells_at_end() {
        let mut scenario = base_scenario();
        scenario.assets.push(PlanItem {
            name: "Boat".to_string(),
            cost: 100_000.0,
            resale: 40_000.0,
            apply_inflation: false,
            ..income_item(60, 70, 0.0)
        });

        let outcome = process_scenario(&scenario);
        let item = &outcome.items[0];

        assert_eq!(item.title, "Asset: Boat");
        let breakdown = item.breakdown.as_ref().unwrap();
        assert_relative_eq!(breakdown.trade_in_values[9], 40_000.0, epsilon = 1e-6);
        assert!(item.rows[9].drawdown < 0.0);
    }

    #[test]
    fn test_medical_uses_default_window() {
        let mut scenario = base_scenario();
        scenario.medical.cost = 6_000.0;

        let outcome = process_scenario(&scenario);
        let item = &outcome.items[0];

        assert_eq!(item.title, "Medical Buffer");
        assert_eq!(item.fund_age, 60);
        // Deferral runs from age 60 to the default start at 70
        assert_eq!(item.rows.len(), 40);
        for row in &item.rows[..10] {
            assert_eq!(row.drawdown, 0.0);
        }
        assert_relative_eq!(
            item.rows[10].drawdown,
            6_000.0 * 1.03f64.powi(10),
            epsilon = 1.0
        );
    }

    #[test]
    fn test_degenerate_items_are_skipped() {
        let mut scenario = base_scenario();
        scenario.incomes.push(income_item(80, 70, 50_000.0));
        scenario.incomes.push(income_item(60, 80, 0.0));
        scenario.travel.push(PlanItem {
            name: "Nowhere".to_string(),
            cost: 0.0,
            ..income_item(60, 70, 0.0)
        });

        let outcome = process_scenario(&scenario);
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.total_capital, 0.0);
    }

    #[test]
    fn test_results_preserve_document_order() {
        let mut scenario = base_scenario();
        scenario.incomes.push(income_item(60, 85, 80_000.0));
        scenario.cars.push(PlanItem {
            name: "Car".to_string(),
            cost: 50_000.0,
            cycle: 10,
            ..income_item(60, 0, 0.0)
        });
        scenario.travel.push(PlanItem {
            name: "Europe".to_string(),
            cost: 15_000.0,
            ..income_item(60, 75, 0.0)
        });
        scenario.medical.cost = 6_000.0;

        let outcome = process_scenario(&scenario);

        let titles: Vec<&str> = outcome.items.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Income Stream: Retirement",
                "Vehicle: Car",
                "Travel: Europe",
                "Medical Buffer"
            ]
        );

        let pv_sum: f64 = outcome.items.iter().map(|r| r.present_value_capital).sum();
        assert_relative_eq!(outcome.total_capital, pv_sum);
    }

    #[test]
    fn test_scenario_from_json_end_to_end() {
        let json = r#"{
            "profile": {"p1_name": "Alex", "p1_dob": "1966-04-12",
                        "p2_name": "Sam", "p2_dob": "1969-09-30"},
            "assumptions": {"income_return": 3.5, "growth_return": 4.5,
                            "tax_rate": 15.0, "inflation": 3.0, "fee_load": 1.1},
            "incomes": [{"name": "Retirement", "income": 80000, "start": 60, "end": 85}],
            "medical": {"cost": 6000}
        }"#;
        let scenario = crate::plan::load_scenario_from_reader(json.as_bytes()).unwrap();

        let outcome = process_scenario(&scenario);

        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[0].title, "Income Stream: Retirement");
        assert_eq!(outcome.items[1].title, "Medical Buffer");
        assert!(outcome.total_capital > 0.0);
        // Every item survives its own schedule
        for item in &outcome.items {
            assert!(item.rows.last().unwrap().closing_balance >= -0.01);
        }
    }

    #[test]
    fn test_item_override_reaches_engine() {
        let mut scenario = base_scenario();
        let mut item = income_item(60, 70, 50_000.0);
        item.fee_load = Some(0.0);
        item.portfolio = Some(PortfolioPreset::Conservative);
        scenario.incomes.push(item);

        let outcome = process_scenario(&scenario);
        let item = &outcome.items[0];

        assert_eq!(item.rates.portfolio, PortfolioPreset::Conservative);
        assert_eq!(item.rates.fee_load, 0.0);
        assert_eq!(item.rows[0].fees, 0.0);
    }
}
