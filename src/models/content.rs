use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a section sits on the composite page
///
/// Leading sections render first, body sections (the dynamic ones) next,
/// trailing sections last. Ordering inside a group is by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionGroup {
    Leading,
    Body,
    Trailing,
}

/// The five hard-coded page sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedSectionKind {
    Hero,
    About,
    Features,
    Solutions,
    Contact,
}

impl FixedSectionKind {
    pub const ALL: [FixedSectionKind; 5] = [
        FixedSectionKind::Hero,
        FixedSectionKind::About,
        FixedSectionKind::Features,
        FixedSectionKind::Solutions,
        FixedSectionKind::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FixedSectionKind::Hero => "hero",
            FixedSectionKind::About => "about",
            FixedSectionKind::Features => "features",
            FixedSectionKind::Solutions => "solutions",
            FixedSectionKind::Contact => "contact",
        }
    }

    pub fn storage_key(&self) -> &'static str {
        match self {
            FixedSectionKind::Hero => "reign-cms-data-hero",
            FixedSectionKind::About => "reign-cms-data-about",
            FixedSectionKind::Features => "reign-cms-data-features",
            FixedSectionKind::Solutions => "reign-cms-data-solutions",
            FixedSectionKind::Contact => "reign-cms-data-contact",
        }
    }

    pub fn group(&self) -> SectionGroup {
        match self {
            FixedSectionKind::Hero | FixedSectionKind::Features | FixedSectionKind::Solutions => {
                SectionGroup::Leading
            }
            FixedSectionKind::About | FixedSectionKind::Contact => SectionGroup::Trailing,
        }
    }

    /// Position inside the section's group
    pub fn rank(&self) -> i64 {
        match self {
            FixedSectionKind::Hero => 0,
            FixedSectionKind::Features => 1,
            FixedSectionKind::Solutions => 2,
            FixedSectionKind::About => 0,
            FixedSectionKind::Contact => 1,
        }
    }

    /// Flat `order` value older page data used for this section
    pub fn legacy_order(&self) -> i64 {
        match self {
            FixedSectionKind::Hero => -5,
            FixedSectionKind::Features => -4,
            FixedSectionKind::Solutions => -3,
            FixedSectionKind::About => 1000,
            FixedSectionKind::Contact => 1001,
        }
    }
}

impl fmt::Display for FixedSectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixedSectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FixedSectionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("Unknown fixed section: {}", s))
    }
}

/// A fixed section record persisted under its own key
pub trait FixedRecord: Serialize + DeserializeOwned + Default + Clone {
    const KIND: FixedSectionKind;

    fn set_last_updated(&mut self, at: DateTime<Utc>);
}

macro_rules! fixed_record {
    ($ty:ty, $kind:expr) => {
        impl FixedRecord for $ty {
            const KIND: FixedSectionKind = $kind;

            fn set_last_updated(&mut self, at: DateTime<Utc>) {
                self.last_updated = Some(at);
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub primary_button_text: String,
    pub primary_button_link: String,
    pub secondary_button_text: String,
    pub secondary_button_link: String,
    pub background_image: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for HeroContent {
    fn default() -> Self {
        Self {
            title: "Transform Your Business".to_string(),
            subtitle: "Innovative solutions for a digital world".to_string(),
            description: "We help organizations modernize their operations with \
                          technology that scales."
                .to_string(),
            primary_button_text: "Get Started".to_string(),
            primary_button_link: "#contact".to_string(),
            secondary_button_text: "Learn More".to_string(),
            secondary_button_link: "#about".to_string(),
            background_image: None,
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub mission: String,
    pub vision: String,
    pub image: Option<String>,
    pub stats: Vec<Stat>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for AboutContent {
    fn default() -> Self {
        Self {
            title: "About Us".to_string(),
            subtitle: "Who we are".to_string(),
            description: "A team of engineers and designers focused on practical results."
                .to_string(),
            mission: "Deliver technology that makes work simpler.".to_string(),
            vision: "Every organization running on tools it trusts.".to_string(),
            image: None,
            stats: vec![
                Stat {
                    label: "Clients".to_string(),
                    value: "150+".to_string(),
                },
                Stat {
                    label: "Years".to_string(),
                    value: "10".to_string(),
                },
            ],
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureItem {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeaturesContent {
    pub title: String,
    pub subtitle: String,
    pub features: Vec<FeatureItem>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for FeaturesContent {
    fn default() -> Self {
        Self {
            title: "Features".to_string(),
            subtitle: "Everything you need to move faster".to_string(),
            features: vec![
                FeatureItem {
                    icon: "⚡".to_string(),
                    title: "Fast".to_string(),
                    description: "Built for performance from day one.".to_string(),
                },
                FeatureItem {
                    icon: "🔒".to_string(),
                    title: "Secure".to_string(),
                    description: "Security reviewed at every layer.".to_string(),
                },
                FeatureItem {
                    icon: "📈".to_string(),
                    title: "Scalable".to_string(),
                    description: "Grows with your business.".to_string(),
                },
            ],
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionItem {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolutionsContent {
    pub title: String,
    pub subtitle: String,
    pub solutions: Vec<SolutionItem>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for SolutionsContent {
    fn default() -> Self {
        Self {
            title: "Solutions".to_string(),
            subtitle: "Tailored to your industry".to_string(),
            solutions: vec![
                SolutionItem {
                    title: "Cloud Migration".to_string(),
                    description: "Move workloads to the cloud without downtime.".to_string(),
                    image: None,
                    link: None,
                },
                SolutionItem {
                    title: "Data Analytics".to_string(),
                    description: "Turn raw data into decisions.".to_string(),
                    image: None,
                    link: None,
                },
            ],
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactContent {
    pub title: String,
    pub subtitle: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub form_enabled: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for ContactContent {
    fn default() -> Self {
        Self {
            title: "Contact Us".to_string(),
            subtitle: "We'd love to hear from you".to_string(),
            email: "hello@example.com".to_string(),
            phone: "+1 (555) 010-0000".to_string(),
            address: "100 Market Street, San Francisco, CA".to_string(),
            form_enabled: true,
            last_updated: None,
        }
    }
}

fixed_record!(HeroContent, FixedSectionKind::Hero);
fixed_record!(AboutContent, FixedSectionKind::About);
fixed_record!(FeaturesContent, FixedSectionKind::Features);
fixed_record!(SolutionsContent, FixedSectionKind::Solutions);
fixed_record!(ContactContent, FixedSectionKind::Contact);

/// One fixed section's data, tagged with its kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "lowercase")]
pub enum FixedSection {
    Hero(HeroContent),
    About(AboutContent),
    Features(FeaturesContent),
    Solutions(SolutionsContent),
    Contact(ContactContent),
}

impl FixedSection {
    pub fn kind(&self) -> FixedSectionKind {
        match self {
            FixedSection::Hero(_) => FixedSectionKind::Hero,
            FixedSection::About(_) => FixedSectionKind::About,
            FixedSection::Features(_) => FixedSectionKind::Features,
            FixedSection::Solutions(_) => FixedSectionKind::Solutions,
            FixedSection::Contact(_) => FixedSectionKind::Contact,
        }
    }
}

/// All fixed section records loaded together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedContent {
    pub hero: HeroContent,
    pub about: AboutContent,
    pub features: FeaturesContent,
    pub solutions: SolutionsContent,
    pub contact: ContactContent,
}

impl FixedContent {
    pub fn into_sections(self) -> Vec<FixedSection> {
        vec![
            FixedSection::Hero(self.hero),
            FixedSection::Features(self.features),
            FixedSection::Solutions(self.solutions),
            FixedSection::About(self.about),
            FixedSection::Contact(self.contact),
        ]
    }
}
