//! Compiled-in option tables. Duplicates are tolerated here and removed when
//! the catalog is built.

use super::age_bands;
use super::{Category, Gender};

const REGIONS: &[&str] = &[
    "caracas", "maracaibo", "valencia", "barquisimeto", "ciudad_guayana", "maturin", "merida",
    "san_cristobal", "barcelona", "puerto_la_cruz", "ciudad_bolivar", "tucupita", "porlamar",
    "valera", "acarigua", "guanare", "san_fernando", "trujillo", "el_tigre", "cabimas",
    "punto_fijo", "ciudad_ojeda", "puerto_cabello", "valle_de_la_pascua",
    "san_juan_de_los_morros", "carora", "tocuyo", "duaca", "siquisique", "araure", "turen",
    "guanarito", "santa_elena", "el_venado", "san_rafael", "san_antonio", "la_fria", "rubio",
    "colon", "tachira", "apure", "amazonas", "delta_amacuro", "yacambu", "lara", "portuguesa",
    "cojedes", "guarico", "anzoategui", "monagas", "sucre", "nueva_esparta", "falcon", "zulia",
    "barinas", "yaracuy", "carabobo", "aragua", "miranda", "vargas", "distrito_capital",
];

const SKIN_TONES: &[&str] = &[
    "light", "fair", "medium", "medium-dark", "olive", "tan", "golden", "bronze", "caramel",
    "honey", "dark", "rich brown", "coffee", "mahogany", "espresso", "chocolate", "mocha",
    "cinnamon", "amber", "copper", "peach", "ivory", "beige", "sand", "cream", "wheat", "almond",
    "hazelnut", "walnut", "chestnut", "cocoa", "ebony",
];

const HAIR_COLORS: &[&str] = &[
    "black", "dark brown", "brown", "auburn", "chestnut", "chocolate", "espresso", "mahogany",
    "copper", "bronze", "light brown", "honey", "golden", "blonde", "strawberry blonde", "red",
    "ginger", "salt and pepper", "gray", "white", "platinum", "ash blonde", "dirty blonde",
    "sandy", "caramel", "cinnamon", "russet", "burgundy", "gold", "silver", "pepper", "salt",
    "mixed",
];

const EYE_COLORS: &[&str] = &[
    "dark brown", "brown", "hazel", "amber", "light brown", "honey", "golden", "coffee",
    "chocolate", "mahogany", "green", "blue", "gray", "blue-green", "hazel-green", "amber-brown",
    "light hazel", "dark hazel", "emerald", "forest green", "sea green", "teal", "steel blue",
    "navy blue", "sky blue", "ice blue", "violet", "purple", "gold", "copper", "mixed",
];

const FACE_SHAPES: &[&str] = &[
    "oval", "round", "square", "heart", "diamond", "long", "triangular", "pear",
    "inverted triangle", "rectangular", "angular", "soft", "defined", "symmetrical",
    "asymmetrical", "wide", "narrow", "broad", "thin", "full", "hollow", "prominent", "recessed",
    "rounded",
];

const NOSE_SHAPES: &[&str] = &[
    "straight", "aquiline", "button", "wide", "narrow", "small", "prominent", "delicate",
    "strong", "refined", "classic", "distinctive", "roman", "snub", "hooked", "bulbous",
    "pointed", "flat", "upturned", "downturned", "asymmetric", "crooked", "broad", "thin", "long",
    "short", "large", "tiny", "bent", "bumpy", "smooth", "elegant", "sturdy", "dainty",
];

const LIP_SHAPES: &[&str] = &[
    "full", "medium", "thin", "wide", "narrow", "plump", "defined", "natural", "shapely",
    "expressive", "delicate", "strong", "pouty", "bow-shaped", "heart-shaped", "straight",
    "curved", "asymmetric", "uneven", "thick", "long", "short", "prominent", "subtle", "large",
    "small", "pursed", "relaxed", "voluptuous", "petite", "charming",
];

const EYE_SHAPES: &[&str] = &[
    "almond", "round", "hooded", "deep-set", "wide-set", "close-set", "upturned", "downturned",
    "monolid", "double-lid", "expressive", "intense", "gentle", "piercing", "sleepy", "alert",
    "droopy", "cat-like", "asymmetric", "large", "small", "prominent", "recessed", "sunken",
    "puffy", "narrow", "wide", "slanted", "straight", "doll-like", "fox-like",
];

const HAIR_STYLES: &[&str] = &[
    "straight", "wavy", "curly", "braided", "ponytail", "bun", "pixie", "bob", "shoulder-length",
    "layered", "textured", "voluminous", "sleek", "styled", "natural", "professional", "casual",
    "messy", "neat", "tidy", "unkempt", "wild", "smooth", "thick", "thin", "fine", "coarse",
    "silky", "frizzy", "tangled",
];

const EYEBROW_SHAPES: &[&str] = &[
    "thick", "medium", "thin", "arched", "straight", "defined", "natural", "bushy", "sparse",
    "uneven", "asymmetric", "high", "low", "close", "wide", "angled", "curved", "messy", "neat",
    "tidy", "unkempt", "smooth", "patchy", "full", "partial", "overgrown", "trimmed", "shaped",
    "microbladed",
];

const JAWLINE_TYPES: &[&str] = &[
    "strong", "soft", "defined", "rounded", "angular", "delicate", "square", "pointed", "weak",
    "prominent", "recessed", "asymmetric", "uneven", "wide", "narrow", "broad", "thin", "full",
    "sharp", "blunt", "chiseled", "hard", "firm", "masculine", "feminine",
];

const CHEEKBONE_TYPES: &[&str] = &[
    "high", "medium", "low", "prominent", "subtle", "defined", "sharp", "soft", "angular",
    "rounded", "asymmetric", "uneven", "wide", "narrow", "hollow", "full", "broad", "thin",
    "strong", "weak", "chiseled", "smooth", "flat", "raised", "sunken", "sculpted", "natural",
];

const SKIN_TEXTURES: &[&str] = &[
    "smooth", "textured", "natural", "mature", "youthful", "rough", "fine", "coarse", "porous",
    "tight", "loose", "elastic", "dry", "oily", "combination", "blemished", "clear",
    "acne-prone", "sensitive", "resilient", "thick", "thin", "firm", "soft", "aged", "fresh",
    "dull", "glowing", "radiant", "dewy", "matte",
];

const BEAUTY_LEVELS: &[&str] = &[
    "muy_atractivo", "atractivo", "normal", "promedio", "comun", "ordinario", "poco_atractivo",
    "realista", "variado", "excepcional", "hermoso", "guapo", "bonito", "lindo", "encantador",
    "carismatico", "interesante", "unico", "distintivo",
];

const FRECKLE_TYPES: &[&str] = &[
    "none", "light", "moderate", "heavy", "scattered", "concentrated", "bridge", "cheeks",
    "forehead", "nose", "chin", "sparse", "dense", "faint", "dark", "red", "brown", "golden",
    "sun-kissed", "natural",
];

const MOLE_TYPES: &[&str] = &[
    "none", "small", "medium", "large", "multiple", "cheek", "chin", "forehead", "nose", "lip",
    "eye", "ear", "neck", "facial", "beauty", "mark", "birthmark",
];

const SCAR_TYPES: &[&str] = &[
    "none", "small", "faint", "visible", "cheek", "chin", "forehead", "nose", "lip", "eye", "ear",
    "neck", "surgical", "accident", "childhood", "old", "healed", "faded",
];

const ACNE_TYPES: &[&str] = &[
    "none", "mild", "moderate", "severe", "scattered", "concentrated", "forehead", "cheeks",
    "chin", "nose", "active", "healing", "scarred", "blackheads", "whiteheads",
];

const FACE_WIDTHS: &[&str] = &["narrow", "medium", "wide", "broad", "thin"];
const CHINS: &[&str] = &["pointed", "rounded", "square", "recessed", "prominent"];
const BONE_STRUCTURES: &[&str] = &["prominent", "delicate", "strong", "soft"];
const EYE_SIZES: &[&str] = &["small", "medium", "large", "prominent"];
const EYELID_TYPES: &[&str] = &["monolid", "double_lid", "hooded", "deep_set"];
const NOSE_SIZES: &[&str] = &["small", "medium", "large", "prominent"];
const NOSE_BRIDGES: &[&str] = &["high", "medium", "low", "flat"];
const LIP_THICKNESSES: &[&str] = &["thin", "medium", "thick", "full"];
const SKIN_UNDERTONES: &[&str] = &["warm", "cool", "neutral", "olive"];
const HAIR_TEXTURES: &[&str] = &["straight", "wavy", "curly", "coily"];
const HAIR_LENGTHS: &[&str] = &["short", "medium", "long", "very long"];

const FACIAL_HAIR: &[&str] = &["none", "light", "moderate", "heavy"];
const BEARDS: &[&str] = &["none", "stubble", "short", "medium", "long", "full"];
const MUSTACHES: &[&str] = &["none", "light", "medium", "thick", "handlebar"];
const MAKEUP: &[&str] = &[
    "none", "natural", "minimal", "light", "subtle", "soft", "gentle", "delicate", "simple",
    "basic", "clean", "fresh",
];

const CLOTHING_TYPES: &[&str] = &[
    "dress shirt", "polo shirt", "t-shirt", "sweater", "jacket", "suit", "blouse", "cardigan",
];
const CLOTHING_COLORS: &[&str] = &[
    "blue", "black", "gray", "brown", "green", "red", "navy", "dark blue", "burgundy", "olive",
];
const BODY_TYPES: &[&str] = &["thin", "normal", "athletic", "muscular", "overweight", "obese"];

const MALE_HAIR_LENGTHS: &[&str] = &[
    "short", "very short", "buzz cut", "crew cut", "medium short", "medium", "long short",
];
const FEMALE_HAIR_LENGTHS: &[&str] = &[
    "long", "very long", "shoulder length", "medium long", "medium", "short", "chin length",
];

pub(super) fn base_options(category: Category) -> Vec<&'static str> {
    let table: &[&str] = match category {
        Category::Region => REGIONS,
        Category::FaceShape => FACE_SHAPES,
        Category::FaceWidth => FACE_WIDTHS,
        Category::Jawline => JAWLINE_TYPES,
        Category::Chin => CHINS,
        Category::Cheekbones => CHEEKBONE_TYPES,
        Category::BoneStructure => BONE_STRUCTURES,
        Category::EyeColor => EYE_COLORS,
        Category::EyeShape => EYE_SHAPES,
        Category::EyeSize => EYE_SIZES,
        Category::EyelidType => EYELID_TYPES,
        Category::Eyebrows => EYEBROW_SHAPES,
        Category::NoseShape => NOSE_SHAPES,
        Category::NoseSize => NOSE_SIZES,
        Category::NoseBridge => NOSE_BRIDGES,
        Category::LipShape => LIP_SHAPES,
        Category::LipThickness => LIP_THICKNESSES,
        Category::SkinTone => SKIN_TONES,
        Category::SkinUndertone => SKIN_UNDERTONES,
        Category::SkinTexture => SKIN_TEXTURES,
        Category::Freckles => FRECKLE_TYPES,
        Category::Moles => MOLE_TYPES,
        Category::Scars => SCAR_TYPES,
        Category::Acne => ACNE_TYPES,
        Category::AgeSpots | Category::Wrinkles | Category::SkinElasticity => {
            return age_bands::all_options(category);
        }
        Category::HairColor => HAIR_COLORS,
        Category::HairTexture => HAIR_TEXTURES,
        Category::HairLength => HAIR_LENGTHS,
        Category::HairStyle => HAIR_STYLES,
        Category::FacialHair => FACIAL_HAIR,
        Category::Beard => BEARDS,
        Category::Mustache => MUSTACHES,
        Category::Makeup => MAKEUP,
        Category::BeautyLevel => BEAUTY_LEVELS,
        Category::ClothingType => CLOTHING_TYPES,
        Category::ClothingColor => CLOTHING_COLORS,
        Category::BodyType => BODY_TYPES,
    };
    table.to_vec()
}

pub(super) fn gendered_options(gender: Gender) -> Vec<(Category, Vec<&'static str>)> {
    match gender {
        Gender::Male => vec![(Category::HairLength, MALE_HAIR_LENGTHS.to_vec())],
        Gender::Female => vec![(Category::HairLength, FEMALE_HAIR_LENGTHS.to_vec())],
    }
}
