//! Turns a profile into prompt text for the image backend.

use super::model::Profile;
use crate::catalog::{Category, Gender, NONE_VALUE};
use serde::{Deserialize, Serialize};

const HIGH_VOLUME_KEYWORDS: &[&str] = &[
    "afro", "dread", "dreadlocks", "locs", "bantu", "thick", "wild", "unkempt", "huge", "massive",
    "big", "messy", "voluminous", "braids", "box braids", "twists", "cornrows", "mohawk",
];

const PASSPORT_SAFE_STYLES: &[&str] = &[
    "neat", "tidy", "sleek", "straight", "straightened", "bun", "low bun", "ponytail",
    "low ponytail", "bob", "pixie", "shoulder-length", "layered", "professional", "natural",
    "clean", "well-groomed", "short", "crew cut", "fade", "side part", "center part", "updo",
    "chignon",
];

const FRAMING: &[&str] = &[
    "passport photo, official ID photo",
    "strictly frontal view, head and shoulders visible, head centered",
    "neutral expression, mouth closed, eyes open looking at camera",
    "solid white background, professional uniform lighting, no shadows",
    "no earrings, no jewelry, no glasses, no hat, no head accessories",
    "no white clothing, colored clothing",
    "hair neatly groomed, low volume, fits within frame",
    "realistic, photorealistic, natural skin texture, natural imperfections",
    "sharp focus, correct exposure, natural colors",
];

const NEGATIVE_PROMPT: &str = "3/4 view, side profile, looking away, tilted head, smiling, \
laughing, multiple people, double exposure, photo of photo, blurry, low quality, distorted, \
deformed, bad anatomy, extra limbs, extra heads, watermark, text, signature, border, shadows, \
colored background, background objects, earrings, jewelry, necklaces, glasses, hat, \
heavy makeup, retouched, airbrushed, glamour, fashion model, perfect skin, flawless skin, \
braids, cornrows, dreadlocks, locs, afro, mohawk, high volume hair, messy hair, hair in face, \
white clothing, white shirt";

/// Prompt and negative prompt for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptText {
    pub prompt: String,
    pub negative_prompt: String,
}

/// Low-volume rendering of a hair style.
pub fn passport_safe_hair_style(style: &str) -> &str {
    let lower = style.to_lowercase();
    if PASSPORT_SAFE_STYLES.iter().any(|allowed| *allowed == lower) {
        return style;
    }
    if HIGH_VOLUME_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return "neat";
    }
    style
}

pub fn build_prompt(profile: &Profile) -> PromptText {
    let mut parts: Vec<String> = FRAMING.iter().map(|s| s.to_string()).collect();
    let demographics = &profile.demographics;
    parts.push(format!(
        "{} {} from {}, {} years old, from the {} region",
        demographics.nationality,
        gender_noun(demographics.gender),
        demographics.nationality,
        demographics.age,
        demographics.region.replace('_', " "),
    ));

    for category in Category::traits() {
        let value = profile.trait_or_none(category);
        if let Some(phrase) = trait_phrase(category, value, demographics.gender) {
            parts.push(phrase);
        }
    }

    PromptText {
        prompt: parts.join(", "),
        negative_prompt: NEGATIVE_PROMPT.to_string(),
    }
}

fn gender_noun(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "man",
        Gender::Female => "woman",
    }
}

fn trait_phrase(category: Category, value: &str, gender: Gender) -> Option<String> {
    if value.is_empty() || value == NONE_VALUE {
        return None;
    }
    if let Some(gated) = category.gated_gender() {
        if gated != gender {
            return None;
        }
    }
    let value = value.replace('_', " ");
    let phrase = match category {
        Category::Region => return None,
        Category::FaceShape => format!("{value} face shape"),
        Category::FaceWidth => format!("{value} face width"),
        Category::Jawline => format!("{value} jawline"),
        Category::Chin => format!("{value} chin"),
        Category::Cheekbones => format!("{value} cheekbones"),
        Category::BoneStructure => format!("{value} bone structure"),
        Category::EyeColor => format!("{value} eyes"),
        Category::EyeShape => format!("{value} eye shape"),
        Category::EyeSize => format!("{value} eye size"),
        Category::EyelidType => format!("{value} eyelids"),
        Category::Eyebrows => format!("{value} eyebrows"),
        Category::NoseShape => format!("{value} nose"),
        Category::NoseSize => format!("{value} nose size"),
        Category::NoseBridge => format!("{value} nose bridge"),
        Category::LipShape => format!("{value} lips"),
        Category::LipThickness => format!("{value} lip thickness"),
        Category::SkinTone => format!("{value} skin tone"),
        Category::SkinUndertone => format!("{value} skin undertone"),
        Category::SkinTexture => format!("{value} skin texture"),
        Category::Freckles => format!("{value} freckles"),
        Category::Moles => format!("{value} moles"),
        Category::Scars => format!("{value} scars"),
        Category::Acne => format!("{value} acne"),
        Category::AgeSpots => value,
        Category::Wrinkles => format!("{value} wrinkles"),
        Category::SkinElasticity => format!("{value} skin elasticity"),
        Category::HairColor => format!("{value} hair"),
        Category::HairTexture => format!("{value} hair texture"),
        Category::HairLength => format!("{value} hair length"),
        Category::HairStyle => format!("{} hair style", passport_safe_hair_style(&value)),
        Category::FacialHair => format!("{value} facial hair"),
        Category::Beard => format!("{value} beard"),
        Category::Mustache => format!("{value} mustache"),
        Category::Makeup => format!("{value} makeup"),
        Category::BeautyLevel => format!("{value} appearance"),
        Category::ClothingType => value,
        Category::ClothingColor => format!("{value} clothing"),
        Category::BodyType => format!("{value} build"),
    };
    Some(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::model::{Demographics, GenerationMethod};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn profile(gender: Gender, traits: &[(Category, &str)]) -> Profile {
        Profile {
            image_id: "profile_0000000000000000".into(),
            demographics: Demographics {
                nationality: "venezuelan".into(),
                gender,
                age: 34,
                region: "puerto_la_cruz".into(),
            },
            traits: traits
                .iter()
                .map(|(c, v)| (*c, v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            generated_at: Utc::now(),
            generation_method: GenerationMethod::WeightedSampling,
            uniqueness_score: 0.9,
        }
    }

    #[test]
    fn high_volume_styles_become_neat() {
        assert_eq!(passport_safe_hair_style("voluminous"), "neat");
        assert_eq!(passport_safe_hair_style("Box Braids"), "neat");
        assert_eq!(passport_safe_hair_style("messy"), "neat");
        assert_eq!(passport_safe_hair_style("bob"), "bob");
        assert_eq!(passport_safe_hair_style("wavy"), "wavy");
    }

    #[test]
    fn none_values_are_left_out() {
        let p = profile(
            Gender::Female,
            &[(Category::SkinTone, "olive"), (Category::Freckles, "none"), (Category::HairStyle, "afro")],
        );
        let text = build_prompt(&p);
        assert!(text.prompt.contains("olive skin tone"));
        assert!(!text.prompt.contains("freckles"));
        assert!(text.prompt.contains("neat hair style"));
        assert!(text.prompt.contains("puerto la cruz region"));
        assert!(text.negative_prompt.contains("side profile"));
    }

    #[test]
    fn gated_phrases_follow_gender() {
        let man = profile(Gender::Male, &[(Category::Beard, "stubble"), (Category::Makeup, "natural")]);
        let text = build_prompt(&man).prompt;
        assert!(text.contains("stubble beard"));
        assert!(!text.contains("natural makeup"));

        let woman = profile(Gender::Female, &[(Category::Beard, "stubble"), (Category::Makeup, "natural")]);
        let text = build_prompt(&woman).prompt;
        assert!(!text.contains("beard"));
        assert!(text.contains("natural makeup"));
    }
}
