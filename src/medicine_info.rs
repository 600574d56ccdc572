use crate::error::FinderError;
use crate::matcher::normalize_name;

const TABLE: &[(&str, &str)] = &[
    (
        "Paracetamol",
        "Used for: Relieves mild to moderate pain and reduces fever.\n\
         Dosage: 500–1000 mg every 4–6 hours as needed (max 4000 mg/day).\n\
         Side effects: Rare; may include nausea or allergic reaction.",
    ),
    (
        "Ibuprofen",
        "Used for: Reduces pain, inflammation, and fever.\n\
         Dosage: 200–400 mg every 6 hours with food.\n\
         Side effects: Stomach upset, heartburn, dizziness.",
    ),
    (
        "Vitamin C",
        "Used for: Supports immune system and tissue repair.\n\
         Dosage: 500–1000 mg daily.\n\
         Side effects: High doses may cause diarrhea or stomach cramps.",
    ),
    (
        "Amoxicillin",
        "Used for: Treats bacterial infections (ear, throat, urinary tract, etc.).\n\
         Dosage: 500 mg every 8 hours or as prescribed by a doctor.\n\
         Side effects: Nausea, diarrhea, or rash.",
    ),
    (
        "Cough Syrup",
        "Used for: Relieves cough and throat irritation.\n\
         Dosage: 5–10 mL every 4–6 hours as needed.\n\
         Side effects: Drowsiness, dizziness, or dry mouth.",
    ),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MedicineInfo {
    /// Canonical table name when known, otherwise the name as asked.
    pub name: String,
    pub text: String,
    pub known: bool,
}

/// Usage, dosage and side-effect notes for `name`.
///
/// The lookup is an exact, case-insensitive match on the whole name; unknown
/// medicines get a generic referral text rather than an error. Blank names are
/// rejected.
pub fn lookup(name: &str) -> Result<MedicineInfo, FinderError> {
    if name.trim().is_empty() {
        return Err(FinderError::BlankMedicine);
    }
    let wanted = normalize_name(name);
    let info = match TABLE.iter().find(|(k, _)| normalize_name(k) == wanted) {
        Some((canonical, text)) => MedicineInfo {
            name: canonical.to_string(),
            text: text.to_string(),
            known: true,
        },
        None => MedicineInfo {
            name: name.to_string(),
            text: format!("No detailed info available for {name}. Please consult a pharmacist."),
            known: false,
        },
    };
    Ok(info)
}
