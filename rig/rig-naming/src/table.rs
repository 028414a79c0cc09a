//! Ordered bone alias tables and name standardization.
//!
//! The alias table is the domain knowledge of this crate: which raw bone
//! names, across MMD, Mixamo, Biped, Source and other rig conventions, map
//! onto which canonical humanoid bone. Matching is first-match-wins over
//! declaration order, so the table is an ordered list rather than a map;
//! two tables with the same entries in a different order are different
//! tables.
//!
//! Patterns may carry a side placeholder: `\Left` expands to `Left`/`Right`
//! and `\L` to `L`/`R`. Lowercase placeholder variants are unnecessary
//! because [`standardize_name`] uppercases after every word boundary before
//! matching.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{NamingError, NamingResult};

/// Word-form side placeholder accepted in patterns.
const WORD_PLACEHOLDER: &str = r"\Left";
/// Letter-form side placeholder accepted in patterns.
const LETTER_PLACEHOLDER: &str = r"\L";

/// Which side of the body a sided pattern resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The character's left.
    Left,
    /// The character's right.
    Right,
}

impl Side {
    /// Full side word, substituted for `\Left`.
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }

    /// Single-letter side tag, substituted for `\L`.
    #[must_use]
    pub const fn letter(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
        }
    }
}

/// How a bone name was resolved during canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// The name matched an alias pattern in declaration order.
    ExactAlias,
    /// The name joined a fuzzy similarity cluster.
    FuzzyCluster,
    /// No table entry or cluster claimed the name.
    Unmatched,
}

/// Normalizes a raw bone name for table matching.
///
/// Dashes become underscores, then the first character and every character
/// following a space or underscore are uppercased, then a leading
/// `ValveBiped_` is stripped. All other characters are left untouched, so
/// names with interior capitals (`LowerBody`) keep them.
///
/// # Example
///
/// ```
/// use rig_naming::standardize_name;
///
/// assert_eq!(standardize_name("bip01-pelvis"), "Bip01_Pelvis");
/// assert_eq!(standardize_name("lower body"), "Lower Body");
/// assert_eq!(standardize_name("ValveBiped_Bip01_L_Hand"), "Bip01_L_Hand");
/// ```
#[must_use]
pub fn standardize_name(raw: &str) -> String {
    let dashless = raw.replace('-', "_");
    let mut out = String::with_capacity(dashless.len());
    let mut boundary = true;
    for ch in dashless.chars() {
        if boundary {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        boundary = ch == ' ' || ch == '_';
    }
    match out.strip_prefix("ValveBiped_") {
        Some(rest) => rest.to_string(),
        None => out,
    }
}

/// Reports whether a pattern carries a side placeholder.
#[must_use]
pub fn has_side_placeholder(pattern: &str) -> bool {
    pattern.contains(LETTER_PLACEHOLDER)
}

/// Substitutes one side into a pattern's placeholders.
///
/// `\Left` is replaced before `\L` so the word form is never mangled by
/// the letter form. Patterns without placeholders pass through unchanged.
#[must_use]
pub fn apply_side(pattern: &str, side: Side) -> String {
    pattern
        .replace(WORD_PLACEHOLDER, side.word())
        .replace(LETTER_PLACEHOLDER, side.letter())
}

/// Expands a pattern into its concrete side variants.
///
/// A pattern with a placeholder yields a left and a right variant, in that
/// order; a pattern without yields itself once, unsided.
#[must_use]
pub fn expand_pattern(pattern: &str) -> SmallVec<[(Option<Side>, String); 2]> {
    if !has_side_placeholder(pattern) {
        return smallvec::smallvec![(None, pattern.to_string())];
    }
    [Side::Left, Side::Right]
        .iter()
        .map(|&side| (Some(side), apply_side(pattern, side)))
        .collect()
}

/// One canonical bone slot and the alias patterns that map onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSlot {
    /// Canonical name, possibly containing a side placeholder.
    pub canonical: String,
    /// Alias patterns tried in order. The canonical name itself is an
    /// implicit first alias.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Marks the torso chain slot whose matches are distributed over
    /// `Spine`/`Chest`/`Upper Chest` rather than renamed one-to-one.
    #[serde(default)]
    pub chain: bool,
}

impl AliasSlot {
    /// Creates a slot from a canonical name and its aliases.
    #[must_use]
    pub fn new(canonical: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            canonical: canonical.into(),
            aliases,
            chain: false,
        }
    }
}

/// Folds helper vertex groups into a canonical bone's group.
///
/// Twist, sleeve, and auto-rig deform helpers carry weights that belong on
/// the canonical bone once a rig is simplified. Both fields may carry side
/// placeholders, which expand coherently: the left target receives the
/// left sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReweightRule {
    /// Group receiving the weights.
    pub target: String,
    /// Groups whose weights are folded into the target and then removed.
    pub sources: Vec<String>,
}

/// A successful alias-table match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    /// Side-resolved canonical name (`Hips`, `Left arm`, `Eye_R`).
    pub canonical: String,
    /// Index of the matched slot in declaration order.
    pub slot: usize,
    /// Side the match resolved to, if the slot or pattern was sided.
    pub side: Option<Side>,
}

/// The full bone-name knowledge base: alias slots in priority order plus
/// the junk, keep, parenting, and reweight tables that drive repair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoneTable {
    /// Canonical slots tried in order during canonicalization.
    pub slots: Vec<AliasSlot>,
    /// Exact names of bones that carry no useful weights.
    #[serde(default)]
    pub junk: Vec<String>,
    /// Name prefixes marking junk bones.
    #[serde(default)]
    pub junk_prefixes: Vec<String>,
    /// Name suffixes marking junk bones (IK tips and end markers).
    #[serde(default)]
    pub junk_suffixes: Vec<String>,
    /// Child-to-parent edges applied after canonicalization, in order.
    #[serde(default)]
    pub parenting: Vec<(String, String)>,
    /// Bones never deleted by cleanup passes.
    #[serde(default)]
    pub keep: Vec<String>,
    /// Canonical humanoid bones used to detect a mergeable skeleton and to
    /// drive merge-time weight folding.
    #[serde(default)]
    pub main_bones: Vec<String>,
    /// Helper-group folds applied after renaming.
    #[serde(default)]
    pub reweight: Vec<ReweightRule>,
    /// Sideless names resolved by scanning descendants, mapped to the base
    /// word of the sided replacement (`Shoulder` -> `shoulder`).
    #[serde(default)]
    pub unknown_side: Vec<(String, String)>,
}

impl BoneTable {
    /// Loads a table from its JSON form and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the table fails
    /// [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> NamingResult<Self> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Serializes the table to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> NamingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks structural invariants: no empty canonical names, no empty
    /// patterns, no duplicate canonical names.
    ///
    /// Duplicates are checked on the literal canonical string. A sided
    /// slot like `\Left arm` may legitimately coexist with a literal
    /// `Left arm` slot; the data relies on that.
    ///
    /// # Errors
    ///
    /// Returns the first violation found in declaration order.
    pub fn validate(&self) -> NamingResult<()> {
        let mut seen: hashbrown::HashSet<&str> = hashbrown::HashSet::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.canonical.is_empty() {
                return Err(NamingError::EmptyCanonical { index });
            }
            if !seen.insert(slot.canonical.as_str()) {
                return Err(NamingError::DuplicateCanonical {
                    name: slot.canonical.clone(),
                });
            }
            if slot.aliases.iter().any(String::is_empty) {
                return Err(NamingError::EmptyPattern {
                    canonical: slot.canonical.clone(),
                });
            }
        }
        Ok(())
    }

    /// Matches a standardized bone name against the table.
    ///
    /// Slots are tried in declaration order and the first hit wins. Within
    /// a sided slot the whole left pass runs before the right pass, so an
    /// unsided alias under a sided slot (MMD's bare `Lower` under
    /// `\Left ankle`) resolves to the left side.
    ///
    /// The name is matched as-is; callers normally pass it through
    /// [`standardize_name`] first.
    #[must_use]
    pub fn match_name(&self, name: &str) -> Option<NameMatch> {
        for (idx, slot) in self.slots.iter().enumerate() {
            if has_side_placeholder(&slot.canonical) {
                for side in [Side::Left, Side::Right] {
                    let canonical = apply_side(&slot.canonical, side);
                    if canonical == name
                        || slot.aliases.iter().any(|a| apply_side(a, side) == name)
                    {
                        return Some(NameMatch {
                            canonical,
                            slot: idx,
                            side: Some(side),
                        });
                    }
                }
            } else {
                if slot.canonical == name {
                    return Some(NameMatch {
                        canonical: slot.canonical.clone(),
                        slot: idx,
                        side: None,
                    });
                }
                for alias in &slot.aliases {
                    for (side, expanded) in expand_pattern(alias) {
                        if expanded == name {
                            return Some(NameMatch {
                                canonical: slot.canonical.clone(),
                                slot: idx,
                                side,
                            });
                        }
                    }
                }
            }
        }
        None
    }

    /// Index of the torso chain slot, if the table declares one.
    #[must_use]
    pub fn chain_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.chain)
    }

    /// Reports whether a name belongs to a junk bone.
    #[must_use]
    pub fn is_junk(&self, name: &str) -> bool {
        self.junk.iter().any(|j| j == name)
            || self.junk_prefixes.iter().any(|p| name.starts_with(p.as_str()))
            || self.junk_suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }

    /// Reports whether a name is protected from cleanup deletion.
    #[must_use]
    pub fn is_kept(&self, name: &str) -> bool {
        self.keep.iter().any(|k| k == name)
    }

    /// Reports whether a name is one of the canonical main bones.
    #[must_use]
    pub fn is_main_bone(&self, name: &str) -> bool {
        self.main_bones.iter().any(|m| m == name)
    }
}
