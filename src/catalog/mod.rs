//! Static option tables for every trait dimension.
//!
//! The catalog is built once per process and shared read-only by every
//! generation job. Categories are a closed enumeration so an unknown category
//! can only appear at the string boundary (`Category::from_str`), never inside
//! the sampling code.

pub mod age_bands;
mod tables;

pub use age_bands::AgeBandResolver;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Value used by gated and absent traits.
pub const NONE_VALUE: &str = "none";

/// A single trait dimension with a discrete option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Region,
    FaceShape,
    FaceWidth,
    Jawline,
    Chin,
    Cheekbones,
    BoneStructure,
    EyeColor,
    EyeShape,
    EyeSize,
    EyelidType,
    Eyebrows,
    NoseShape,
    NoseSize,
    NoseBridge,
    LipShape,
    LipThickness,
    SkinTone,
    SkinUndertone,
    SkinTexture,
    Freckles,
    Moles,
    Scars,
    Acne,
    AgeSpots,
    Wrinkles,
    SkinElasticity,
    HairColor,
    HairTexture,
    HairLength,
    HairStyle,
    FacialHair,
    Beard,
    Mustache,
    Makeup,
    BeautyLevel,
    ClothingType,
    ClothingColor,
    BodyType,
}

impl Category {
    pub const ALL: [Category; 39] = [
        Category::Region,
        Category::FaceShape,
        Category::FaceWidth,
        Category::Jawline,
        Category::Chin,
        Category::Cheekbones,
        Category::BoneStructure,
        Category::EyeColor,
        Category::EyeShape,
        Category::EyeSize,
        Category::EyelidType,
        Category::Eyebrows,
        Category::NoseShape,
        Category::NoseSize,
        Category::NoseBridge,
        Category::LipShape,
        Category::LipThickness,
        Category::SkinTone,
        Category::SkinUndertone,
        Category::SkinTexture,
        Category::Freckles,
        Category::Moles,
        Category::Scars,
        Category::Acne,
        Category::AgeSpots,
        Category::Wrinkles,
        Category::SkinElasticity,
        Category::HairColor,
        Category::HairTexture,
        Category::HairLength,
        Category::HairStyle,
        Category::FacialHair,
        Category::Beard,
        Category::Mustache,
        Category::Makeup,
        Category::BeautyLevel,
        Category::ClothingType,
        Category::ClothingColor,
        Category::BodyType,
    ];

    /// Every category that becomes a trait field on a profile.
    pub fn traits() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter().filter(|c| !c.is_demographic())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Region => "region",
            Category::FaceShape => "face_shape",
            Category::FaceWidth => "face_width",
            Category::Jawline => "jawline",
            Category::Chin => "chin",
            Category::Cheekbones => "cheekbones",
            Category::BoneStructure => "bone_structure",
            Category::EyeColor => "eye_color",
            Category::EyeShape => "eye_shape",
            Category::EyeSize => "eye_size",
            Category::EyelidType => "eyelid_type",
            Category::Eyebrows => "eyebrows",
            Category::NoseShape => "nose_shape",
            Category::NoseSize => "nose_size",
            Category::NoseBridge => "nose_bridge",
            Category::LipShape => "lip_shape",
            Category::LipThickness => "lip_thickness",
            Category::SkinTone => "skin_tone",
            Category::SkinUndertone => "skin_undertone",
            Category::SkinTexture => "skin_texture",
            Category::Freckles => "freckles",
            Category::Moles => "moles",
            Category::Scars => "scars",
            Category::Acne => "acne",
            Category::AgeSpots => "age_spots",
            Category::Wrinkles => "wrinkles",
            Category::SkinElasticity => "skin_elasticity",
            Category::HairColor => "hair_color",
            Category::HairTexture => "hair_texture",
            Category::HairLength => "hair_length",
            Category::HairStyle => "hair_style",
            Category::FacialHair => "facial_hair",
            Category::Beard => "beard",
            Category::Mustache => "mustache",
            Category::Makeup => "makeup",
            Category::BeautyLevel => "beauty_level",
            Category::ClothingType => "clothing_type",
            Category::ClothingColor => "clothing_color",
            Category::BodyType => "body_type",
        }
    }

    /// Region is carried on the demographics block rather than as a trait.
    pub fn is_demographic(&self) -> bool {
        matches!(self, Category::Region)
    }

    /// Categories whose history and weighting are tracked per gender.
    pub fn is_segmented(&self) -> bool {
        matches!(
            self,
            Category::FaceShape
                | Category::NoseShape
                | Category::LipShape
                | Category::EyeShape
                | Category::Jawline
                | Category::Cheekbones
                | Category::Eyebrows
                | Category::SkinTexture
                | Category::HairStyle
                | Category::HairLength
                | Category::FacialHair
                | Category::Beard
                | Category::Mustache
                | Category::Makeup
        )
    }

    /// The only gender allowed a non-"none" value, for gated categories.
    pub fn gated_gender(&self) -> Option<Gender> {
        match self {
            Category::FacialHair | Category::Beard | Category::Mustache => Some(Gender::Male),
            Category::Makeup => Some(Gender::Female),
            _ => None,
        }
    }

    /// Categories whose candidates depend on the slot's age.
    pub fn is_age_conditioned(&self) -> bool {
        matches!(
            self,
            Category::Wrinkles | Category::AgeSpots | Category::SkinElasticity
        )
    }

    /// Segment under which this category's history is kept for `gender`.
    pub fn segment_for(&self, gender: Gender) -> Segment {
        if self.is_segmented() {
            Segment::from(gender)
        } else {
            Segment::General
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .with_context(|| format!("Unknown trait category '{s}'"))
    }
}

/// Gender resolved once at request validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "man" | "hombre" | "masculino" => Ok(Gender::Male),
            "female" | "woman" | "mujer" | "femenino" => Ok(Gender::Female),
            other => bail!("Unrecognised gender '{other}' (expected male or female)"),
        }
    }
}

/// Population partition under which history and weighting are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    General,
    Male,
    Female,
}

impl From<Gender> for Segment {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => Segment::Male,
            Gender::Female => Segment::Female,
        }
    }
}

impl Segment {
    pub fn gender(&self) -> Option<Gender> {
        match self {
            Segment::General => None,
            Segment::Male => Some(Gender::Male),
            Segment::Female => Some(Gender::Female),
        }
    }

    pub fn is_gendered(&self) -> bool {
        !matches!(self, Segment::General)
    }
}

/// Process-wide option sets, immutable after construction.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    base: HashMap<Category, Vec<String>>,
    gendered: HashMap<(Category, Gender), Vec<String>>,
    none_only: Vec<String>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryCatalog {
    /// Catalog built from the compiled-in tables.
    pub fn builtin() -> Self {
        let mut base = HashMap::new();
        for category in Category::ALL {
            base.insert(category, ordered_set(tables::base_options(category)));
        }
        let mut gendered = HashMap::new();
        for gender in [Gender::Male, Gender::Female] {
            for (category, options) in tables::gendered_options(gender) {
                gendered.insert((category, gender), ordered_set(options));
            }
        }
        Self {
            base,
            gendered,
            none_only: vec![NONE_VALUE.to_string()],
        }
    }

    /// Builtin catalog with category lists replaced from a JSON or YAML file.
    pub fn with_overrides_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog overrides {:?}", path))?;
        let raw: BTreeMap<String, Vec<String>> = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&data)
                .with_context(|| format!("Failed to parse catalog overrides {:?}", path))?,
            Some("json") => serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse catalog overrides {:?}", path))?,
            _ => bail!("Catalog overrides {:?} must be a .json, .yaml or .yml file", path),
        };
        let mut catalog = Self::builtin();
        for (name, options) in raw {
            let category: Category = name.parse()?;
            catalog.replace(category, options)?;
        }
        Ok(catalog)
    }

    /// Replaces the base list of one category.
    pub fn replace(&mut self, category: Category, options: Vec<String>) -> Result<()> {
        if category.is_age_conditioned() {
            bail!("Category '{category}' is resolved by age band and cannot be overridden");
        }
        let options = ordered_set(options.iter().map(|s| s.trim()).filter(|s| !s.is_empty()));
        if options.is_empty() {
            bail!("Catalog override for '{category}' has no options");
        }
        self.base.insert(category, options);
        self.gendered.retain(|(c, _), _| *c != category);
        Ok(())
    }

    /// Effective option set for `category` as seen by `segment`.
    ///
    /// Gated categories collapse to `{"none"}` for any segment other than the
    /// gated gender. Age-conditioned categories return their full union here;
    /// per-slot candidates come from [`AgeBandResolver`].
    pub fn options_for(&self, category: Category, segment: Segment) -> &[String] {
        if let Some(gated) = category.gated_gender() {
            if segment.gender() != Some(gated) {
                return &self.none_only;
            }
        }
        if let Some(gender) = segment.gender() {
            if let Some(options) = self.gendered.get(&(category, gender)) {
                return options;
            }
        }
        self.base
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&self.none_only)
    }

    /// Whether `value` is a valid explicit choice for `category` in any segment.
    pub fn contains(&self, category: Category, value: &str) -> bool {
        let in_base = self
            .base
            .get(&category)
            .is_some_and(|options| options.iter().any(|o| o == value));
        in_base
            || [Gender::Male, Gender::Female].into_iter().any(|g| {
                self.gendered
                    .get(&(category, g))
                    .is_some_and(|options| options.iter().any(|o| o == value))
            })
    }
}

/// Deduplicates while keeping the first occurrence of each value.
fn ordered_set<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        let value = value.as_ref();
        if seen.insert(value.to_string()) {
            out.push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn gated_categories_collapse_to_none_for_other_segments() {
        let catalog = CategoryCatalog::builtin();
        for category in [Category::FacialHair, Category::Beard, Category::Mustache] {
            assert_eq!(catalog.options_for(category, Segment::Female), ["none"]);
            assert_eq!(catalog.options_for(category, Segment::General), ["none"]);
            assert!(catalog.options_for(category, Segment::Male).len() > 1);
        }
        assert_eq!(catalog.options_for(Category::Makeup, Segment::Male), ["none"]);
        assert!(catalog.options_for(Category::Makeup, Segment::Female).len() > 1);
    }

    #[test]
    fn tables_are_deduplicated_in_catalog_order() {
        let catalog = CategoryCatalog::builtin();
        for category in Category::ALL {
            let options = catalog.options_for(category, Segment::General);
            let unique: HashSet<_> = options.iter().collect();
            assert_eq!(unique.len(), options.len(), "{category} has duplicates");
        }
        assert_eq!(
            catalog.options_for(Category::FaceShape, Segment::General)[0],
            "oval"
        );
    }

    #[test]
    fn hair_length_uses_gender_specific_lists() {
        let catalog = CategoryCatalog::builtin();
        let male = catalog.options_for(Category::HairLength, Segment::Male);
        let female = catalog.options_for(Category::HairLength, Segment::Female);
        assert!(male.iter().any(|o| o == "buzz cut"));
        assert!(!female.iter().any(|o| o == "buzz cut"));
        assert!(catalog.contains(Category::HairLength, "chin length"));
    }

    #[test]
    fn category_names_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("eye_colour".parse::<Category>().is_err());
    }

    #[test]
    fn gender_accepts_spanish_spellings() {
        assert_eq!("Hombre".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" mujer ".parse::<Gender>().unwrap(), Gender::Female);
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn overrides_file_replaces_lists() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        writeln!(file, "skin_tone: [amber, amber, copper]")?;
        let catalog = CategoryCatalog::with_overrides_file(file.path())?;
        assert_eq!(
            catalog.options_for(Category::SkinTone, Segment::General),
            ["amber", "copper"]
        );
        Ok(())
    }

    #[test]
    fn overrides_file_rejects_unknown_and_empty_entries() -> Result<()> {
        let mut unknown = tempfile::Builder::new().suffix(".json").tempfile()?;
        write!(unknown, r#"{{"tattoos": ["none"]}}"#)?;
        assert!(CategoryCatalog::with_overrides_file(unknown.path()).is_err());

        let mut empty = tempfile::Builder::new().suffix(".json").tempfile()?;
        write!(empty, r#"{{"skin_tone": []}}"#)?;
        assert!(CategoryCatalog::with_overrides_file(empty.path()).is_err());

        let other = NamedTempFile::new()?;
        assert!(CategoryCatalog::with_overrides_file(other.path()).is_err());
        Ok(())
    }
}
