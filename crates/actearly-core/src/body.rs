//! Body-part categories.
//!
//! Nine canonical regions are tracked for health, in a fixed top-to-bottom
//! order that is also the display and sort order of a session. `General`
//! is a valid exercise category but never counts toward health or score.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Eyes,
    Neck,
    Shoulders,
    Elbows,
    Wrists,
    Back,
    Hips,
    Knees,
    Ankles,
    General,
}

/// Static anatomy notes shown next to a body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartDetail {
    pub description: &'static str,
    pub impact: &'static str,
    pub benefit: &'static str,
}

impl Category {
    /// The tracked regions, top to bottom.
    pub const CANONICAL: [Category; 9] = [
        Category::Eyes,
        Category::Neck,
        Category::Shoulders,
        Category::Elbows,
        Category::Wrists,
        Category::Back,
        Category::Hips,
        Category::Knees,
        Category::Ankles,
    ];

    pub fn is_canonical(self) -> bool {
        self != Category::General
    }

    /// Position in the top-to-bottom ordering. Non-canonical categories sort last.
    pub fn sort_rank(self) -> usize {
        Self::CANONICAL
            .iter()
            .position(|c| *c == self)
            .unwrap_or(Self::CANONICAL.len())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Eyes => "Eyes",
            Category::Neck => "Neck",
            Category::Shoulders => "Shoulders",
            Category::Elbows => "Elbows",
            Category::Wrists => "Wrists",
            Category::Back => "Back",
            Category::Hips => "Hips",
            Category::Knees => "Knees",
            Category::Ankles => "Ankles",
            Category::General => "General",
        }
    }

    /// Anatomy notes for a canonical part; `None` for `General`.
    pub fn detail(self) -> Option<PartDetail> {
        let detail = match self {
            Category::Eyes => PartDetail {
                description: "Ocular muscles & blinking reflex",
                impact: "Reduced blink rate causes dryness; fixed focal length leads to digital eye strain.",
                benefit: "Lubricates eyes and resets ciliary muscles to reduce fatigue.",
            },
            Category::Neck => PartDetail {
                description: "Cervical Spine (C1-C7)",
                impact: "Forward head posture increases effective head weight on the spine by up to 400%.",
                benefit: "Realigns cervical curvature and reduces tension headaches.",
            },
            Category::Shoulders => PartDetail {
                description: "Trapezius & Rotator Cuff",
                impact: "Slouching shortens the pectorals and weakens the upper back.",
                benefit: "Opens the chest for better breathing and corrects posture.",
            },
            Category::Elbows => PartDetail {
                description: "Ulnar Nerve & Flexors",
                impact: "Fixed flexion can compress the ulnar nerve (Cubital Tunnel).",
                benefit: "Releases nerve tension and restores full range of extension.",
            },
            Category::Wrists => PartDetail {
                description: "Carpal Tunnel & Extensors",
                impact: "Extension while typing compresses the median nerve and strains tendons.",
                benefit: "Promotes nerve gliding and reduces risk of repetitive strain injury.",
            },
            Category::Back => PartDetail {
                description: "Thoracic & Lumbar Spine",
                impact: "Static loading compresses intervertebral discs and reduces nutrient exchange.",
                benefit: "Decompresses the spine and stimulates fluid flow to the discs.",
            },
            Category::Hips => PartDetail {
                description: "Hip Flexors (Psoas)",
                impact: "Prolonged sitting shortens hip flexors, tilting the pelvis and loading the lower back.",
                benefit: "Lengthens the psoas and restores pelvic neutrality.",
            },
            Category::Knees => PartDetail {
                description: "Patella & Popliteal",
                impact: "Ninety-degree flexion restricts blood flow and can cause patellar tracking issues.",
                benefit: "Stimulates synovial fluid to lubricate the joint.",
            },
            Category::Ankles => PartDetail {
                description: "Talocrural Joint",
                impact: "Lack of movement lets fluid pool in the lower legs.",
                benefit: "Activates the calf muscle pump to return venous blood to the heart.",
            },
            Category::General => return None,
        };
        Some(detail)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive parse, so CLI input like `neck` works.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::CANONICAL
            .iter()
            .copied()
            .chain(std::iter::once(Category::General))
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown body part: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_top_to_bottom() {
        assert_eq!(Category::CANONICAL.len(), 9);
        assert_eq!(Category::CANONICAL[0], Category::Eyes);
        assert_eq!(Category::CANONICAL[8], Category::Ankles);
        assert!(Category::Neck.sort_rank() < Category::Back.sort_rank());
    }

    #[test]
    fn general_sorts_last_and_is_not_canonical() {
        assert!(!Category::General.is_canonical());
        assert_eq!(Category::General.sort_rank(), 9);
        assert!(Category::General.detail().is_none());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("wrists".parse::<Category>().unwrap(), Category::Wrists);
        assert_eq!(" Hips ".parse::<Category>().unwrap(), Category::Hips);
        assert!("Spleen".parse::<Category>().is_err());
    }

    #[test]
    fn every_canonical_part_has_detail() {
        for part in Category::CANONICAL {
            assert!(part.detail().is_some(), "{part} has no detail");
        }
    }
}
