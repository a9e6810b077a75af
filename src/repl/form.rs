//! Customer details form
//!
//! One prompt per feature, grouped into sections. Each answer is checked
//! against its domain before moving on, and the completed answers go through
//! [`FeatureRecordBuilder`] once more before a record is handed out.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::errors::{ChurnError, Result};
use crate::repl::display::DisplayManager;
use crate::repl::input::LineSource;
use crate::types::{
    AddonService, Contract, CustomerFeatureRecord, FeatureName, Gender, InternetService,
    MultipleLines, PaymentMethod, YesNo,
};
use crate::validation::{
    FeatureRecordBuilder, RawCustomerInput, MONTHLY_CHARGES_RANGE, TENURE_RANGE,
    TOTAL_CHARGES_RANGE,
};

/// Field arrangement and defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormLayout {
    /// Customer details first, then usage and charges
    #[default]
    Sidebar,
    /// Account column, then services and billing column
    Columns,
}

impl FormLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormLayout::Sidebar => "sidebar",
            FormLayout::Columns => "columns",
        }
    }
}

impl fmt::Display for FormLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a field is answered
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Pick one option; the first is the default
    Choice(Vec<&'static str>),
    Integer {
        range: RangeInclusive<i64>,
        default: i64,
    },
    Decimal {
        range: RangeInclusive<f64>,
        default: f64,
    },
}

/// One prompt of the form
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: FeatureName,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    fn choice(name: FeatureName, label: &'static str, options: Vec<&'static str>) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Choice(options),
        }
    }
}

/// Titled group of fields
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
}

const ADDON_LABELS: [(FeatureName, &str); 6] = [
    (FeatureName::OnlineSecurity, "Has Online Security?"),
    (FeatureName::OnlineBackup, "Has Online Backup?"),
    (FeatureName::DeviceProtection, "Has Device Protection?"),
    (FeatureName::TechSupport, "Has Tech Support?"),
    (FeatureName::StreamingTV, "Streams TV?"),
    (FeatureName::StreamingMovies, "Streams Movies?"),
];

fn yes_no(name: FeatureName, label: &'static str) -> FieldSpec {
    FieldSpec::choice(name, label, YesNo::choices())
}

fn senior_citizen(label: &'static str) -> FieldSpec {
    FieldSpec::choice(FeatureName::SeniorCitizen, label, vec!["No", "Yes"])
}

fn tenure(default: i64) -> FieldSpec {
    FieldSpec {
        name: FeatureName::Tenure,
        label: "Tenure (months)",
        kind: FieldKind::Integer {
            range: TENURE_RANGE,
            default,
        },
    }
}

fn charges(name: FeatureName, label: &'static str, default: f64) -> FieldSpec {
    let range = if name == FeatureName::MonthlyCharges {
        MONTHLY_CHARGES_RANGE
    } else {
        TOTAL_CHARGES_RANGE
    };
    FieldSpec {
        name,
        label,
        kind: FieldKind::Decimal { range, default },
    }
}

fn addons(options: Vec<&'static str>) -> impl Iterator<Item = FieldSpec> {
    ADDON_LABELS
        .into_iter()
        .map(move |(name, label)| FieldSpec::choice(name, label, options.clone()))
}

impl FormLayout {
    /// Sections in prompt order
    pub fn sections(&self) -> Vec<Section> {
        match self {
            FormLayout::Sidebar => {
                let mut details = vec![
                    FieldSpec::choice(FeatureName::Gender, "Gender", Gender::choices()),
                    senior_citizen("Senior Citizen"),
                    yes_no(FeatureName::Partner, "Has a Partner?"),
                    yes_no(FeatureName::Dependents, "Has Dependents?"),
                    yes_no(FeatureName::PhoneService, "Has Phone Service?"),
                    FieldSpec::choice(
                        FeatureName::MultipleLines,
                        "Has Multiple Lines?",
                        MultipleLines::choices(),
                    ),
                    FieldSpec::choice(
                        FeatureName::InternetService,
                        "Internet Service",
                        InternetService::choices(),
                    ),
                ];
                details.extend(addons(AddonService::choices()));
                details.extend([
                    FieldSpec::choice(FeatureName::Contract, "Contract Type", Contract::choices()),
                    yes_no(FeatureName::PaperlessBilling, "Uses Paperless Billing?"),
                    FieldSpec::choice(
                        FeatureName::PaymentMethod,
                        "Payment Method",
                        PaymentMethod::choices(),
                    ),
                ]);

                vec![
                    Section {
                        title: "Customer Details",
                        fields: details,
                    },
                    Section {
                        title: "Usage and Charges",
                        fields: vec![
                            tenure(1),
                            charges(FeatureName::MonthlyCharges, "Monthly Charges ($)", 70.5),
                            charges(FeatureName::TotalCharges, "Total Charges ($)", 150.0),
                        ],
                    },
                ]
            }
            FormLayout::Columns => {
                let account = vec![
                    FieldSpec::choice(FeatureName::Gender, "Gender", Gender::choices()),
                    yes_no(FeatureName::Partner, "Has a Partner?"),
                    yes_no(FeatureName::Dependents, "Has Dependents?"),
                    yes_no(FeatureName::PhoneService, "Has Phone Service?"),
                    yes_no(FeatureName::PaperlessBilling, "Uses Paperless Billing?"),
                    senior_citizen("Is a Senior Citizen?"),
                    tenure(24),
                ];

                let mut services = vec![
                    FieldSpec::choice(FeatureName::Contract, "Contract Type", Contract::choices()),
                    FieldSpec::choice(
                        FeatureName::PaymentMethod,
                        "Payment Method",
                        PaymentMethod::choices(),
                    ),
                    FieldSpec::choice(
                        FeatureName::MultipleLines,
                        "Has Multiple Lines?",
                        vec!["No phone service", "No", "Yes"],
                    ),
                    FieldSpec::choice(
                        FeatureName::InternetService,
                        "Internet Service",
                        InternetService::choices(),
                    ),
                ];
                services.extend(addons(vec!["No internet service", "No", "Yes"]));
                services.extend([
                    charges(FeatureName::MonthlyCharges, "Monthly Charges ($)", 70.0),
                    charges(FeatureName::TotalCharges, "Total Charges ($)", 1500.0),
                ]);

                vec![
                    Section {
                        title: "Account",
                        fields: account,
                    },
                    Section {
                        title: "Services and Billing",
                        fields: services,
                    },
                ]
            }
        }
    }

    /// Every field in prompt order
    pub fn fields(&self) -> Vec<FieldSpec> {
        self.sections().into_iter().flat_map(|s| s.fields).collect()
    }
}

/// Whether a field is answered by the dependent-service policy instead of the user
fn is_implied(name: FeatureName, raw: &RawCustomerInput) -> bool {
    match name {
        FeatureName::MultipleLines => raw.get(FeatureName::PhoneService) == Some("No"),
        n if FeatureName::INTERNET_ADDONS.contains(&n) => {
            raw.get(FeatureName::InternetService) == Some("No")
        }
        _ => false,
    }
}

/// Options still consistent with the answers given so far
fn live_options(
    spec: &FieldSpec,
    options: &[&'static str],
    raw: &RawCustomerInput,
) -> Vec<&'static str> {
    let excluded = match spec.name {
        FeatureName::MultipleLines if raw.get(FeatureName::PhoneService) == Some("Yes") => {
            Some(MultipleLines::NoPhoneService.as_str())
        }
        n if FeatureName::INTERNET_ADDONS.contains(&n)
            && raw.contains(FeatureName::InternetService)
            && raw.get(FeatureName::InternetService) != Some("No") =>
        {
            Some(AddonService::NoInternetService.as_str())
        }
        _ => None,
    };
    options
        .iter()
        .copied()
        .filter(|o| Some(*o) != excluded)
        .collect()
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Interactive form producing one validated record per fill
#[derive(Debug, Clone)]
pub struct CustomerForm {
    layout: FormLayout,
    builder: FeatureRecordBuilder,
}

impl CustomerForm {
    pub fn new(layout: FormLayout) -> Self {
        Self {
            layout,
            builder: FeatureRecordBuilder::new(),
        }
    }

    pub fn layout(&self) -> FormLayout {
        self.layout
    }

    /// Ask every field and build the record.
    ///
    /// Returns `Ok(None)` when input ends before the form is complete.
    pub fn fill(
        &self,
        input: &mut dyn LineSource,
        display: &DisplayManager,
    ) -> Result<Option<CustomerFeatureRecord>> {
        let mut raw = RawCustomerInput::new();

        for section in self.layout.sections() {
            display.show_section(section.title);
            for spec in &section.fields {
                if is_implied(spec.name, &raw) {
                    continue;
                }
                match self.ask(spec, &raw, input, display)? {
                    Some(answer) => {
                        raw.set(spec.name, answer);
                    }
                    None => return Ok(None),
                }
            }
        }

        // Answers are checked one by one; the builder also checks how they combine.
        loop {
            match self.builder.build(&raw) {
                Ok(record) => return Ok(Some(record)),
                Err(err @ ChurnError::Validation { .. }) => {
                    let spec = err
                        .field()
                        .and_then(|f| f.parse::<FeatureName>().ok())
                        .and_then(|name| self.layout.fields().into_iter().find(|s| s.name == name))
                        .filter(|spec| !is_implied(spec.name, &raw));
                    let spec = match spec {
                        Some(spec) => spec,
                        None => return Err(err),
                    };
                    display.show_error(&err.to_string());
                    match self.ask(&spec, &raw, input, display)? {
                        Some(answer) => {
                            raw.set(spec.name, answer);
                        }
                        None => return Ok(None),
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Prompt text for a field given the answers so far
    pub fn prompt(&self, spec: &FieldSpec, raw: &RawCustomerInput) -> String {
        match &spec.kind {
            FieldKind::Choice(options) => {
                let options = live_options(spec, options, raw);
                format!(
                    "{} [{}] ({}): ",
                    spec.label,
                    options.join(" / "),
                    options.first().copied().unwrap_or_default()
                )
            }
            FieldKind::Integer { range, default } => format!(
                "{} [{}-{}] ({}): ",
                spec.label,
                range.start(),
                range.end(),
                default
            ),
            FieldKind::Decimal { range, default } => format!(
                "{} [{}-{}] ({}): ",
                spec.label,
                format_amount(*range.start()),
                format_amount(*range.end()),
                format_amount(*default)
            ),
        }
    }

    /// Turn one typed line into the value stored for the field
    pub fn resolve(
        &self,
        spec: &FieldSpec,
        raw: &RawCustomerInput,
        line: &str,
    ) -> std::result::Result<String, String> {
        let line = line.trim();
        let answer = match &spec.kind {
            FieldKind::Choice(options) => {
                let options = live_options(spec, options, raw);
                if line.is_empty() {
                    options.first().map(|o| o.to_string()).unwrap_or_default()
                } else {
                    match options.iter().find(|o| o.eq_ignore_ascii_case(line)) {
                        Some(option) => option.to_string(),
                        None => return Err(format!("choose one of: {}", options.join(", "))),
                    }
                }
            }
            FieldKind::Integer { default, .. } if line.is_empty() => default.to_string(),
            FieldKind::Decimal { default, .. } if line.is_empty() => format_amount(*default),
            _ => line.to_string(),
        };

        self.builder
            .check_value(spec.name, &answer)
            .map_err(|e| e.to_string())?;
        Ok(answer)
    }

    fn ask(
        &self,
        spec: &FieldSpec,
        raw: &RawCustomerInput,
        input: &mut dyn LineSource,
        display: &DisplayManager,
    ) -> Result<Option<String>> {
        let prompt = self.prompt(spec, raw);
        loop {
            let line = match input.read_line(&prompt)? {
                Some(line) => line,
                None => return Ok(None),
            };
            match self.resolve(spec, raw, &line) {
                Ok(answer) => return Ok(Some(answer)),
                Err(reason) => display.show_error(&reason),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::input::ScriptedInput;
    use crate::types::FEATURE_COUNT;
    use std::collections::HashSet;

    fn quiet_display() -> DisplayManager {
        DisplayManager::new().with_confidence_bar(false)
    }

    #[test]
    fn test_each_layout_asks_every_feature_once() {
        for layout in [FormLayout::Sidebar, FormLayout::Columns] {
            let fields = layout.fields();
            assert_eq!(fields.len(), FEATURE_COUNT, "{}", layout);
            let names: HashSet<_> = fields.iter().map(|f| f.name).collect();
            assert_eq!(names.len(), FEATURE_COUNT, "{}", layout);
        }
    }

    #[test]
    fn test_layout_defaults() {
        let form = CustomerForm::new(FormLayout::Sidebar);
        let raw = RawCustomerInput::new();
        let sidebar = FormLayout::Sidebar.fields();
        let tenure = sidebar.iter().find(|f| f.name == FeatureName::Tenure).unwrap();
        assert_eq!(form.resolve(tenure, &raw, "").unwrap(), "1");

        let columns = FormLayout::Columns.fields();
        let total = columns.iter().find(|f| f.name == FeatureName::TotalCharges).unwrap();
        assert_eq!(form.resolve(total, &raw, "").unwrap(), "1500.0");
    }

    #[test]
    fn test_all_defaults_build_a_record() {
        for layout in [FormLayout::Sidebar, FormLayout::Columns] {
            let form = CustomerForm::new(layout);
            let mut input = ScriptedInput::new(vec![""; FEATURE_COUNT]);
            let record = form.fill(&mut input, &quiet_display()).unwrap();
            assert!(record.is_some(), "{}", layout);
        }
    }

    #[test]
    fn test_choice_matching_is_case_insensitive() {
        let form = CustomerForm::new(FormLayout::Sidebar);
        let spec = FieldSpec::choice(FeatureName::Contract, "Contract", Contract::choices());
        let raw = RawCustomerInput::new();
        assert_eq!(form.resolve(&spec, &raw, "two year").unwrap(), "Two year");
        assert!(form.resolve(&spec, &raw, "weekly").is_err());
    }

    #[test]
    fn test_out_of_range_number_rejected() {
        let form = CustomerForm::new(FormLayout::Sidebar);
        let raw = RawCustomerInput::new();
        assert!(form.resolve(&tenure(1), &raw, "73").is_err());
        assert_eq!(form.resolve(&tenure(1), &raw, "72").unwrap(), "72");
    }

    #[test]
    fn test_no_phone_service_hidden_when_phone_present() {
        let form = CustomerForm::new(FormLayout::Columns);
        let raw = RawCustomerInput::new().with(FeatureName::PhoneService, "Yes");
        let spec = FormLayout::Columns
            .fields()
            .into_iter()
            .find(|f| f.name == FeatureName::MultipleLines)
            .unwrap();
        assert_eq!(form.resolve(&spec, &raw, "").unwrap(), "No");
        assert!(form.resolve(&spec, &raw, "No phone service").is_err());
        assert!(!form.prompt(&spec, &raw).contains("No phone service"));
    }

    #[test]
    fn test_dependent_fields_skipped_without_parent_service() {
        let form = CustomerForm::new(FormLayout::Sidebar);
        // gender, senior, partner, dependents, phone=No, internet=No, contract,
        // paperless, payment, tenure, monthly, total
        let answers = [
            "Male", "No", "No", "No", "No", "No", "Two year", "No", "Mailed check", "40", "20",
            "800",
        ];
        let mut input = ScriptedInput::new(answers);
        let record = form.fill(&mut input, &quiet_display()).unwrap().unwrap();

        assert_eq!(input.remaining(), 0);
        assert_eq!(input.prompts().len(), answers.len());
        assert_eq!(record.multiple_lines(), MultipleLines::NoPhoneService);
        for name in FeatureName::INTERNET_ADDONS {
            assert_eq!(record.addon(name), Some(AddonService::NoInternetService));
        }
    }

    #[test]
    fn test_invalid_answer_reprompts() {
        let form = CustomerForm::new(FormLayout::Sidebar);
        let mut answers = vec!["Robot", "Female"];
        answers.extend(vec![""; FEATURE_COUNT - 1]);
        let mut input = ScriptedInput::new(answers);
        let record = form.fill(&mut input, &quiet_display()).unwrap().unwrap();
        assert_eq!(record.gender(), Gender::Female);
        assert_eq!(input.prompts()[0], input.prompts()[1]);
    }

    #[test]
    fn test_end_of_input_abandons_form() {
        let form = CustomerForm::new(FormLayout::Sidebar);
        let mut input = ScriptedInput::new(["Male", "No"]);
        assert!(form.fill(&mut input, &quiet_display()).unwrap().is_none());
    }

    #[test]
    fn test_decimal_prompt_shows_range_and_default() {
        let form = CustomerForm::new(FormLayout::Sidebar);
        let spec = charges(FeatureName::MonthlyCharges, "Monthly Charges ($)", 70.5);
        assert_eq!(
            form.prompt(&spec, &RawCustomerInput::new()),
            "Monthly Charges ($) [0.0-200.0] (70.5): "
        );
    }
}
