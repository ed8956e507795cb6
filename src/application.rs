//! Application categories and their form payloads.

use serde::Deserialize;
use serde_json::Value;
use strum_macros::{Display, EnumString};

/// A category applicants can apply under.
///
/// Parsed from the URL path segment of the apply and verify endpoints.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ApplicationType {
    /// An individual delegate application.
    Delegate,

    /// A press team application.
    Press,

    /// A chair application. `pr` is accepted as a legacy path segment.
    #[strum(to_string = "chair", serialize = "pr")]
    Chair,

    /// An admin team application.
    Admin,

    /// A group application submitted by a school's advisor.
    Delegation,
}

impl ApplicationType {
    /// The capitalized category title used in email subjects.
    pub fn title(self) -> &'static str {
        match self {
            Self::Delegate => "Delegate",
            Self::Press => "Press",
            Self::Chair => "Chair",
            Self::Admin => "Admin",
            Self::Delegation => "Delegation",
        }
    }
}

/// The personal fields shared by every individual application.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    /// The applicant's full name.
    pub full_name: String,

    /// The applicant's phone number.
    pub phone_number: String,

    /// The applicant's national ID number.
    pub national_id: String,

    /// The applicant's birth date.
    pub birth_date: String,

    /// The applicant's gender.
    pub gender: String,

    /// The applicant's school.
    pub school: String,

    /// The applicant's city.
    pub city: String,

    /// The applicant's grade.
    pub grade: String,
}

impl PersonalDetails {
    /// The leading spreadsheet cells of an individual application row.
    fn into_base_cells(self, email: &str) -> Vec<String> {
        vec![
            self.full_name,
            email.to_owned(),
            self.phone_number,
            self.national_id,
            self.birth_date,
            self.gender,
            self.school,
            self.city,
            self.grade,
        ]
    }
}

/// The trailing fields shared by every individual application.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingDetails {
    /// The applicant's dietary preferences, if any.
    #[serde(default)]
    pub dietary_preferences: String,

    /// Anything else the applicant wants to add.
    #[serde(default)]
    pub additional_info: String,
}

impl ClosingDetails {
    /// The trailing spreadsheet cells of an individual application row.
    fn into_cells(self) -> [String; 2] {
        [self.dietary_preferences, self.additional_info]
    }
}

/// A delegate application form.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateForm {
    /// The applicant's personal fields.
    #[serde(flatten)]
    pub personal: PersonalDetails,

    /// The applicant's English proficiency level.
    pub english_level: String,

    /// Up to three committee preferences, most preferred first.
    #[serde(default)]
    pub committee_preferences: Vec<String>,

    /// The applicant's prior MUN experience.
    pub experience: String,

    /// The applicant's motivation letter.
    pub motivation_letter: String,

    /// The applicant's trailing fields.
    #[serde(flatten)]
    pub closing: ClosingDetails,
}

/// A press team application form.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressForm {
    /// The applicant's personal fields.
    #[serde(flatten)]
    pub personal: PersonalDetails,

    /// The applicant's prior experience.
    pub experience: String,

    /// The applicant's motivation letter.
    pub motivation_letter: String,

    /// Whether the applicant has their own camera.
    #[serde(default)]
    pub camera: String,

    /// The applicant's trailing fields.
    #[serde(flatten)]
    pub closing: ClosingDetails,
}

/// A chair application form.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChairForm {
    /// The applicant's personal fields.
    #[serde(flatten)]
    pub personal: PersonalDetails,

    /// The applicant's English proficiency level, if given.
    #[serde(default)]
    pub english_level: Option<String>,

    /// Up to three committee preferences, most preferred first.
    #[serde(default)]
    pub committee_preferences: Vec<String>,

    /// The applicant's prior chairing experience.
    pub experience: String,

    /// The applicant's motivation letter.
    pub motivation_letter: String,

    /// The answer to the General Assembly assessment question.
    #[serde(default)]
    pub chair_answer1: String,

    /// The answer to the procedure assessment question.
    #[serde(default)]
    pub chair_answer2: String,

    /// The answer to the crisis directive assessment question.
    #[serde(default)]
    pub chair_answer3: String,

    /// The applicant's trailing fields.
    #[serde(flatten)]
    pub closing: ClosingDetails,
}

/// An admin team application form.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminForm {
    /// The applicant's personal fields.
    #[serde(flatten)]
    pub personal: PersonalDetails,

    /// The applicant's prior experience.
    pub experience: String,

    /// The applicant's motivation letter.
    pub motivation_letter: String,

    /// The applicant's trailing fields.
    #[serde(flatten)]
    pub closing: ClosingDetails,
}

/// One delegate within a delegation application.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationMember {
    /// The delegate's full name.
    pub full_name: String,

    /// The delegate's own email address.
    pub email: String,

    /// The delegate's phone number.
    pub phone_number: String,

    /// The delegate's national ID number.
    pub national_id: String,

    /// The delegate's birth date.
    pub birth_date: String,

    /// The delegate's gender.
    pub gender: String,

    /// The delegate's grade.
    pub grade: String,

    /// The delegate's city.
    pub city: String,

    /// The delegate's English proficiency level.
    pub english_level: String,

    /// Up to three committee preferences, most preferred first.
    #[serde(default)]
    pub committee_preferences: Vec<String>,

    /// The delegate's prior MUN experience.
    pub experience: String,

    /// The delegate's motivation letter.
    pub motivation_letter: String,

    /// The delegate's dietary preferences, if any.
    #[serde(default)]
    pub dietary_preferences: String,

    /// Anything else the delegate wants to add.
    #[serde(default)]
    pub additional_info: String,
}

/// A delegation (group) application form, submitted by a school's advisor.
///
/// Unknown fields such as the client's delegate count are ignored rather than
/// rejected.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationForm {
    /// The school the delegation represents.
    pub school: String,

    /// The delegation's members.
    pub delegates: Vec<DelegationMember>,
}

/// A parsed application form of any category.
#[derive(Clone, Debug)]
pub enum ApplicationForm {
    /// A delegate application.
    Delegate(DelegateForm),

    /// A press team application.
    Press(PressForm),

    /// A chair application.
    Chair(ChairForm),

    /// An admin team application.
    Admin(AdminForm),

    /// A delegation application.
    Delegation(DelegationForm),
}

impl ApplicationForm {
    /// Deserializes the form fields of a verify request for a category.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or has the wrong type.
    pub fn deserialize(
        application_type: ApplicationType,
        fields: Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match application_type {
            ApplicationType::Delegate => Self::Delegate(serde_json::from_value(fields)?),
            ApplicationType::Press => Self::Press(serde_json::from_value(fields)?),
            ApplicationType::Chair => Self::Chair(serde_json::from_value(fields)?),
            ApplicationType::Admin => Self::Admin(serde_json::from_value(fields)?),
            ApplicationType::Delegation => Self::Delegation(serde_json::from_value(fields)?),
        })
    }

    /// Shapes the form into spreadsheet rows.
    ///
    /// Every category produces rows of a constant width, with unfilled
    /// optional cells emitted as empty strings. Individual categories produce
    /// exactly one row; a delegation produces one row per member.
    pub fn into_rows(self, email: &str) -> Vec<Vec<String>> {
        match self {
            Self::Delegate(form) => {
                let mut row = form.personal.into_base_cells(email);
                row.push(form.english_level);
                row.extend(preference_cells(form.committee_preferences));
                row.push(form.experience);
                row.push(form.motivation_letter);
                row.extend(form.closing.into_cells());
                vec![row]
            }
            Self::Press(form) => {
                let mut row = form.personal.into_base_cells(email);
                row.push(form.experience);
                row.push(form.motivation_letter);
                row.push(form.camera);
                row.extend(form.closing.into_cells());
                vec![row]
            }
            Self::Chair(form) => {
                let mut row = form.personal.into_base_cells(email);
                row.push(form.english_level.unwrap_or_else(|| "N/A".to_owned()));
                row.extend(preference_cells(form.committee_preferences));
                row.push(form.experience);
                row.push(form.motivation_letter);
                // The assessment answers are recorded in question order on the
                // sheet: General Assembly, crisis directive, then procedure.
                row.push(form.chair_answer1);
                row.push(form.chair_answer3);
                row.push(form.chair_answer2);
                row.extend(form.closing.into_cells());
                vec![row]
            }
            Self::Admin(form) => {
                let mut row = form.personal.into_base_cells(email);
                row.push(form.experience);
                row.push(form.motivation_letter);
                row.extend(form.closing.into_cells());
                vec![row]
            }
            Self::Delegation(form) => form
                .delegates
                .into_iter()
                .map(|member| {
                    let mut row = vec![
                        form.school.clone(),
                        email.to_owned(),
                        member.full_name,
                        member.email,
                        member.phone_number,
                        member.national_id,
                        member.birth_date,
                        member.gender,
                        member.grade,
                        member.city,
                        member.english_level,
                    ];
                    row.extend(preference_cells(member.committee_preferences));
                    row.extend([
                        member.experience,
                        member.motivation_letter,
                        member.dietary_preferences,
                        member.additional_info,
                    ]);
                    row
                })
                .collect(),
        }
    }
}

/// Pads or truncates committee preferences to exactly three cells.
fn preference_cells(mut preferences: Vec<String>) -> Vec<String> {
    preferences.resize(3, String::new());
    preferences
}
