use crate::domain::{
    AuthorOwnership, AuthorSplitBreakdown, ContactId, ContractId, ContractTerms, Decimal, Format,
    FormatCalculation, RateSchedule, RoyaltyCalculation, SalesAggregate, StatementAuthor,
    StatementPeriod, TitleId,
};
use crate::engine::{
    aggregate_title, apply_recoupment, calculate_format, split_royalty, CalculationError,
    CalculationOptions, TitleRoyalty,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Everything needed to calculate one title's royalty for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    pub period: StatementPeriod,
    pub title_id: TitleId,
    /// Author the statement is produced for.
    pub author: StatementAuthor,
    pub sales: Vec<SalesAggregate>,
    pub rate_schedules: BTreeMap<Format, RateSchedule>,
    /// Zero or one entry means a single-author title.
    #[serde(default)]
    pub title_authors: Vec<AuthorOwnership>,
    pub contracts: BTreeMap<ContactId, ContractTerms>,
    /// Reserve against returns, taken after format royalties are summed.
    #[serde(default)]
    pub returns_deduction: Decimal,
}

impl CalculationInput {
    pub fn is_split(&self) -> bool {
        self.title_authors.len() > 1
    }
}

/// Composes the engine into a complete statement calculation.
///
/// Holds configuration only, so one instance can serve any number of callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoyaltyCalculator {
    options: CalculationOptions,
}

impl RoyaltyCalculator {
    pub fn new(options: CalculationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CalculationOptions {
        self.options
    }

    /// Calculate royalty for a title and period.
    ///
    /// Pure: identical inputs always produce identical results, and nothing
    /// outside the returned value changes. Safe to use as a dry run.
    pub fn calculate(
        &self,
        input: &CalculationInput,
    ) -> Result<RoyaltyCalculation, CalculationError> {
        let period = input.period;
        if !period.is_valid() {
            return Err(CalculationError::InvalidPeriod {
                start: period.start_date,
                end: period.end_date,
            });
        }

        let format_calculations = self.calculate_formats(input)?;
        let title = aggregate_title(
            &format_calculations,
            input.returns_deduction,
            self.options.rounding,
        )?;

        let calculation = if input.is_split() {
            self.split_calculation(input, format_calculations, title)?
        } else {
            self.single_calculation(input, format_calculations, title)?
        };

        tracing::info!(
            title_id = %calculation.title_id,
            formats = calculation.format_calculations.len(),
            split = calculation.is_split_calculation,
            total = %calculation.title_total_royalty,
            net_payable = %calculation.net_payable,
            "royalty calculated"
        );

        Ok(calculation)
    }

    /// Calculate several independent titles. One failure does not affect the others.
    pub fn calculate_batch(
        &self,
        inputs: &[CalculationInput],
    ) -> Vec<Result<RoyaltyCalculation, CalculationError>> {
        inputs
            .iter()
            .map(|input| {
                self.calculate(input).inspect_err(|err| {
                    tracing::warn!(title_id = %input.title_id, error = %err, "calculation rejected");
                })
            })
            .collect()
    }

    fn calculate_formats(
        &self,
        input: &CalculationInput,
    ) -> Result<Vec<FormatCalculation>, CalculationError> {
        let mut seen = HashSet::new();
        input
            .sales
            .iter()
            .map(|sales| {
                if !seen.insert(sales.format) {
                    return Err(CalculationError::DuplicateFormat(sales.format));
                }
                let schedule = input
                    .rate_schedules
                    .get(&sales.format)
                    .ok_or(CalculationError::MissingRateSchedule(sales.format))?;
                calculate_format(sales, schedule, self.options.rounding)
            })
            .collect()
    }

    fn single_calculation(
        &self,
        input: &CalculationInput,
        format_calculations: Vec<FormatCalculation>,
        title: TitleRoyalty,
    ) -> Result<RoyaltyCalculation, CalculationError> {
        if let Some(owner) = input.title_authors.first() {
            check_statement_author(input, owner)?;
        }
        let terms = contract_for(input, &input.author.contact_id, &input.author.contract_id)?;
        let outcome = apply_recoupment(title.earnable(), terms, self.options.rounding)?;

        Ok(RoyaltyCalculation {
            period: input.period,
            author_id: input.author.contact_id,
            contract_id: input.author.contract_id,
            title_id: input.title_id,
            format_calculations,
            gross_royalty: title.gross,
            returns_deduction: title.returns_deduction,
            title_total_royalty: title.total,
            total_royalty_earned: title.total,
            advance_recoupment: outcome.recoupment,
            net_payable: outcome.net_payable,
            advance_status: Some(outcome.advance_status),
            is_split_calculation: false,
            author_splits: Vec::new(),
        })
    }

    fn split_calculation(
        &self,
        input: &CalculationInput,
        format_calculations: Vec<FormatCalculation>,
        title: TitleRoyalty,
    ) -> Result<RoyaltyCalculation, CalculationError> {
        let statement_owner = input
            .title_authors
            .iter()
            .find(|owner| owner.contact_id == input.author.contact_id)
            .ok_or(CalculationError::UnknownStatementAuthor(input.author.contact_id))?;
        check_statement_author(input, statement_owner)?;

        let amounts = split_royalty(
            title.total,
            &input.title_authors,
            self.options.ownership_policy,
            self.options.rounding,
        )?;

        let mut author_splits = Vec::with_capacity(amounts.len());
        let mut advance_recoupment = Decimal::zero().round_money(self.options.rounding);
        let mut net_payable = advance_recoupment;

        for (owner, split_amount) in input.title_authors.iter().zip(amounts) {
            let terms = contract_for(input, &owner.contact_id, &owner.contract_id)?;
            let outcome = apply_recoupment(split_amount, terms, self.options.rounding)?;

            advance_recoupment = advance_recoupment
                .checked_add(outcome.recoupment)
                .ok_or_else(|| CalculationError::overflow("total advance recoupment"))?;
            net_payable = net_payable
                .checked_add(outcome.net_payable)
                .ok_or_else(|| CalculationError::overflow("total net payable"))?;

            author_splits.push(AuthorSplitBreakdown {
                contact_id: owner.contact_id,
                contract_id: owner.contract_id,
                ownership_percentage: owner.ownership_percentage,
                split_amount,
                recoupment: outcome.recoupment,
                net_payable: outcome.net_payable,
                advance_status: outcome.advance_status,
            });
        }

        Ok(RoyaltyCalculation {
            period: input.period,
            author_id: input.author.contact_id,
            contract_id: input.author.contract_id,
            title_id: input.title_id,
            format_calculations,
            gross_royalty: title.gross,
            returns_deduction: title.returns_deduction,
            title_total_royalty: title.total,
            total_royalty_earned: title.total,
            advance_recoupment,
            net_payable,
            advance_status: None,
            is_split_calculation: true,
            author_splits,
        })
    }
}

/// Terms for `contact_id`, which must belong to `contract_id`.
fn contract_for<'a>(
    input: &'a CalculationInput,
    contact_id: &ContactId,
    contract_id: &ContractId,
) -> Result<&'a ContractTerms, CalculationError> {
    let terms = input
        .contracts
        .get(contact_id)
        .ok_or(CalculationError::MissingContract(*contact_id))?;
    if terms.contract_id != *contract_id {
        return Err(CalculationError::ContractMismatch {
            contact_id: *contact_id,
            expected: *contract_id,
            found: terms.contract_id,
        });
    }
    Ok(terms)
}

/// The ownership row for the statement author must name the same person and contract.
fn check_statement_author(
    input: &CalculationInput,
    owner: &AuthorOwnership,
) -> Result<(), CalculationError> {
    let author = &input.author;
    if owner.contact_id != author.contact_id {
        return Err(CalculationError::UnknownStatementAuthor(author.contact_id));
    }
    if owner.contract_id != author.contract_id {
        return Err(CalculationError::ContractMismatch {
            contact_id: author.contact_id,
            expected: owner.contract_id,
            found: author.contract_id,
        });
    }
    Ok(())
}
