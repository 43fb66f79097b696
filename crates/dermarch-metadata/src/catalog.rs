//! Declarative catalog of the metadata fields the archive recognizes.
//!
//! Each [`FieldSpec`] entry describes one logical field: the submitted
//! column names it answers to, how its raw text is cleaned and coerced,
//! and which bucket the typed value lands in. The parsing pipeline in
//! [`crate::parser`] is generic over these entries, so adding a field is
//! a table edit rather than new code.

use dermarch_model::MetadataValue;

/// How a cleaned string is coerced into a typed value.
#[derive(Debug, Clone, Copy)]
pub enum ValueKind {
    /// Whole number, parsed through float syntax so `"4.0"` is accepted.
    /// Values above `max` are clamped, not rejected.
    Integer { max: Option<i64> },
    Float,
    /// `true`/`yes` and `false`/`no`.
    Flag,
    /// Membership in a fixed vocabulary. `allowed` is kept sorted because
    /// rejection messages list it verbatim.
    Enumerated { allowed: &'static [&'static str] },
}

impl ValueKind {
    /// Type description used in rejection messages.
    pub fn expected(&self) -> String {
        match self {
            Self::Integer { .. } => "integer".to_string(),
            Self::Float => "float".to_string(),
            Self::Flag => "boolean".to_string(),
            Self::Enumerated { allowed } => format!("one of [{}]", allowed.join(", ")),
        }
    }

    /// Short label for catalog listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Integer { .. } => "integer",
            Self::Float => "float",
            Self::Flag => "boolean",
            Self::Enumerated { .. } => "enumerated",
        }
    }
}

/// Where a parsed value is written.
#[derive(Debug, Clone, Copy)]
pub enum LoadRule {
    /// Straight into the clinical bucket under the field's name.
    Clinical,
    /// Into the private bucket, with a derived companion value written to
    /// the clinical bucket. Both targets are conflict-checked before
    /// either is written.
    PrivateWithDerived {
        derived_name: &'static str,
        derive: fn(&MetadataValue) -> MetadataValue,
    },
}

impl LoadRule {
    /// Short label for catalog listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clinical => "clinical",
            Self::PrivateWithDerived { .. } => "private + clinical",
        }
    }
}

/// One recognized metadata field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Canonical name, also the key the value is stored under.
    pub name: &'static str,
    /// Column names accepted for this field, matched case-insensitively.
    /// Stored lowercase.
    pub aliases: &'static [&'static str],
    /// Extra tokens treated as null, beyond the empty string and `unknown`.
    pub null_tokens: &'static [&'static str],
    /// Literal rewrites applied after trimming and lowercasing, before
    /// coercion. Restores canonical casing and folds legacy spellings.
    pub substitutions: &'static [(&'static str, &'static str)],
    pub kind: ValueKind,
    pub load: LoadRule,
    /// Inactive entries are retired from standard ingest but stay in the
    /// catalog so existing stored values remain interpretable.
    pub active: bool,
}

fn derive_age_approx(value: &MetadataValue) -> MetadataValue {
    match value.as_f64() {
        Some(age) => MetadataValue::Integer(((age / 5.0).round() * 5.0) as i64),
        None => MetadataValue::Missing,
    }
}

const SEX: &[&str] = &["female", "male"];

const DIAGNOSIS_CONFIRM_TYPE: &[&str] = &[
    "histopathology",
    "serial imaging showing no change",
    "single image expert consensus",
];

const BENIGN_MALIGNANT: &[&str] = &[
    "benign",
    "indeterminate",
    "indeterminate/benign",
    "indeterminate/malignant",
    "malignant",
];

const DIAGNOSIS: &[&str] = &[
    "AIMP",
    "acrochordon",
    "actinic keratosis",
    "adnexal tumor",
    "angiofibroma or fibrous papule",
    "angiokeratoma",
    "angioma",
    "atypical melanocytic proliferation",
    "atypical spitz tumor",
    "basal cell carcinoma",
    "cafe-au-lait macule",
    "clear cell acanthoma",
    "dermatofibroma",
    "ephelis",
    "epidermal nevus",
    "lentigo NOS",
    "lentigo simplex",
    "lichenoid keratosis",
    "melanoma",
    "melanoma metastasis",
    "merkel cell carcinoma",
    "mucosal melanosis",
    "neurofibroma",
    "nevus",
    "nevus spilus",
    "other",
    "pyogenic granuloma",
    "scar",
    "sebaceous adenoma",
    "sebaceous hyperplasia",
    "seborrheic keratosis",
    "solar lentigo",
    "squamous cell carcinoma",
    "verruca",
];

const NEVUS_TYPE: &[&str] = &[
    "blue",
    "combined",
    "deep penetrating",
    "halo",
    "nevus NOS",
    "other",
    "persistent/recurrent",
    "pigmented spindle cell of reed",
    "plexiform spindle cell",
    "special site",
    "spitz",
];

/// Every recognized field, in the order rows are processed.
pub static FIELD_CATALOG: &[FieldSpec] = &[
    FieldSpec {
        name: "age",
        aliases: &["age"],
        null_tokens: &[],
        // "85+" is a legacy de-identification marker for ages at the cap.
        substitutions: &[("85+", "85")],
        kind: ValueKind::Integer { max: Some(85) },
        load: LoadRule::PrivateWithDerived {
            derived_name: "age_approx",
            derive: derive_age_approx,
        },
        active: true,
    },
    FieldSpec {
        name: "sex",
        aliases: &["sex", "gender"],
        null_tokens: &[],
        substitutions: &[("m", "male"), ("f", "female")],
        kind: ValueKind::Enumerated { allowed: SEX },
        load: LoadRule::Clinical,
        active: true,
    },
    FieldSpec {
        name: "family_hx_mm",
        aliases: &["family_hx_mm", "famhxmm"],
        null_tokens: &[],
        substitutions: &[],
        kind: ValueKind::Flag,
        load: LoadRule::Clinical,
        active: true,
    },
    FieldSpec {
        name: "personal_hx_mm",
        aliases: &["personal_hx_mm"],
        null_tokens: &[],
        substitutions: &[],
        kind: ValueKind::Flag,
        load: LoadRule::Clinical,
        active: true,
    },
    FieldSpec {
        name: "clin_size_long_diam_mm",
        aliases: &["clin_size_long_diam_mm"],
        null_tokens: &[],
        substitutions: &[],
        kind: ValueKind::Float,
        load: LoadRule::Clinical,
        active: true,
    },
    FieldSpec {
        name: "melanocytic",
        aliases: &["melanocytic"],
        null_tokens: &[],
        substitutions: &[],
        kind: ValueKind::Flag,
        load: LoadRule::Clinical,
        active: true,
    },
    FieldSpec {
        name: "diagnosis_confirm_type",
        aliases: &["diagnosis_confirm_type"],
        null_tokens: &[],
        substitutions: &[],
        kind: ValueKind::Enumerated {
            allowed: DIAGNOSIS_CONFIRM_TYPE,
        },
        load: LoadRule::Clinical,
        active: true,
    },
    FieldSpec {
        name: "benign_malignant",
        aliases: &["benign_malignant", "ben_mal"],
        null_tokens: &[],
        substitutions: &[("indeterminable", "indeterminate")],
        kind: ValueKind::Enumerated {
            allowed: BENIGN_MALIGNANT,
        },
        load: LoadRule::Clinical,
        active: true,
    },
    FieldSpec {
        name: "diagnosis",
        aliases: &["diagnosis", "path_diagnosis"],
        null_tokens: &[],
        substitutions: &[
            ("aimp", "AIMP"),
            ("lentigo nos", "lentigo NOS"),
            // Accent variant seen in some submitted sheets.
            ("caf\u{e9}-au-lait macule", "cafe-au-lait macule"),
        ],
        kind: ValueKind::Enumerated { allowed: DIAGNOSIS },
        load: LoadRule::Clinical,
        active: true,
    },
    FieldSpec {
        name: "nevus_type",
        aliases: &["nevus_type"],
        null_tokens: &["not applicable"],
        substitutions: &[("nevus nos", "nevus NOS")],
        kind: ValueKind::Enumerated {
            allowed: NEVUS_TYPE,
        },
        load: LoadRule::Clinical,
        active: false,
    },
];

/// Looks up a catalog entry by canonical name.
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELD_CATALOG.iter().find(|spec| spec.name == name)
}
