//! Built-in exercise library.
//!
//! Used for local selection and as the fallback whenever the content
//! provider cannot deliver a session.

use std::sync::OnceLock;

use crate::body::Category;
use crate::exercise::{Compatibility, Exercise, Posture};

struct Entry {
    name: &'static str,
    category: Category,
    posture: Posture,
    standing_recommended: bool,
    compatibility: Compatibility,
    instructions: [&'static str; 3],
    benefits: &'static str,
    prevention: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        name: "20-20-20 Reset",
        category: Category::Eyes,
        posture: Posture::Seated,
        standing_recommended: true,
        compatibility: Compatibility::Both,
        instructions: [
            "Find an object at least 20 feet away.",
            "Focus on it intensely for 20 seconds.",
            "Blink rapidly for the remaining time to lubricate eyes.",
        ],
        benefits: "Resets the ciliary muscle of the eye.",
        prevention: "Reduces digital eye strain and prevents myopia progression.",
    },
    Entry {
        name: "Ocular Palming",
        category: Category::Eyes,
        posture: Posture::Seated,
        standing_recommended: false,
        compatibility: Compatibility::Both,
        instructions: [
            "Rub your hands together to create heat.",
            "Gently cup your palms over closed eyes.",
            "Breathe deeply and enjoy the total darkness.",
        ],
        benefits: "Soothes the optic nerve and relaxes facial muscles.",
        prevention: "Prevents stress-induced eye twitching and tension headaches.",
    },
    Entry {
        name: "Cervical Chin Tucks",
        category: Category::Neck,
        posture: Posture::Seated,
        standing_recommended: true,
        compatibility: Compatibility::Both,
        instructions: [
            "Sit tall and look straight ahead.",
            "Gently pull your chin straight back like making a double-chin.",
            "Hold for 3 seconds, release and repeat.",
        ],
        benefits: "Strengthens deep neck flexors.",
        prevention: "Prevents 'Tech Neck' and upper cervical disc compression.",
    },
    Entry {
        name: "Levator Scapulae Stretch",
        category: Category::Neck,
        posture: Posture::Seated,
        standing_recommended: false,
        compatibility: Compatibility::Both,
        instructions: [
            "Sit on your right hand to anchor the shoulder.",
            "Turn head 45 degrees left and look down at your armpit.",
            "Gently assist with your left hand for 30s, then switch sides.",
        ],
        benefits: "Releases the muscle that shrugs your shoulders under stress.",
        prevention: "Prevents chronic neck stiffness and tension headaches.",
    },
    Entry {
        name: "Scapular Squeezes",
        category: Category::Shoulders,
        posture: Posture::Seated,
        standing_recommended: true,
        compatibility: Compatibility::Both,
        instructions: [
            "Imagine a pencil between your shoulder blades.",
            "Squeeze the blades together and down away from ears.",
            "Hold for 5 seconds and repeat.",
        ],
        benefits: "Activates the rhomboids and mid-trapezius.",
        prevention: "Corrects rounded shoulders and prevents impingement syndrome.",
    },
    Entry {
        name: "Desk Wall Slides",
        category: Category::Shoulders,
        posture: Posture::Standing,
        standing_recommended: false,
        compatibility: Compatibility::Home,
        instructions: [
            "Stand with back against a wall or sit tall.",
            "Form a 'W' shape with arms, elbows and wrists against the wall.",
            "Slowly slide arms up into a 'Y' and back down.",
        ],
        benefits: "Improves shoulder mobility and thoracic extension.",
        prevention: "Prevents rotator cuff tears and frozen shoulder.",
    },
    Entry {
        name: "The Prayer Stretch",
        category: Category::Wrists,
        posture: Posture::Seated,
        standing_recommended: true,
        compatibility: Compatibility::Both,
        instructions: [
            "Place palms together in front of your chest.",
            "Slowly lower hands toward your waist while keeping palms flat.",
            "Hold for 10s, release, and repeat.",
        ],
        benefits: "Stretches the wrist flexors.",
        prevention: "Prevents Carpal Tunnel Syndrome and tendonitis.",
    },
    Entry {
        name: "Nerve Gliding",
        category: Category::Wrists,
        posture: Posture::Seated,
        standing_recommended: false,
        compatibility: Compatibility::Both,
        instructions: [
            "Extend arm forward, palm up.",
            "Slowly tilt hand down toward floor, then back toward shoulder.",
            "Repeat with gentle, fluid motions. Switch arms at 30s.",
        ],
        benefits: "Flushes the median nerve through the carpal tunnel.",
        prevention: "Reduces numbness and tingling in fingers.",
    },
    Entry {
        name: "Seated Spinal Twist",
        category: Category::Back,
        posture: Posture::Seated,
        standing_recommended: false,
        compatibility: Compatibility::Both,
        instructions: [
            "Sit sideways on your chair.",
            "Use the chair back to gently twist your torso.",
            "Hold for 30s per side. Breathe into the twist.",
        ],
        benefits: "Mobilizes the thoracic spine and improves digestion.",
        prevention: "Prevents lower back stiffness and disc degeneration.",
    },
    Entry {
        name: "Seated Cat-Cow",
        category: Category::Back,
        posture: Posture::Seated,
        standing_recommended: true,
        compatibility: Compatibility::Both,
        instructions: [
            "Place hands on knees.",
            "Inhale: Arch back and look up (Cow).",
            "Exhale: Round spine and tuck chin (Cat). Flow with breath.",
        ],
        benefits: "Moves every vertebra in the spine.",
        prevention: "Maintains spinal fluid flow and prevents postural slump.",
    },
    Entry {
        name: "Seated Figure Four",
        category: Category::Hips,
        posture: Posture::Seated,
        standing_recommended: false,
        compatibility: Compatibility::Both,
        instructions: [
            "Cross right ankle over left knee.",
            "Flex the right foot and sit very tall.",
            "Gently lean forward with a flat back. 30s per side.",
        ],
        benefits: "Stretches the piriformis and glutes.",
        prevention: "Prevents sciatica and lower back referred pain.",
    },
    Entry {
        name: "Office Hip Flexor Release",
        category: Category::Hips,
        posture: Posture::Standing,
        standing_recommended: true,
        compatibility: Compatibility::Both,
        instructions: [
            "Stand up and take a small step back with one foot.",
            "Tuck your tailbone and squeeze the glute of the back leg.",
            "Feel a gentle stretch in the front of the hip. 30s per side.",
        ],
        benefits: "Lengthens the psoas muscle.",
        prevention: "Corrects pelvic tilt caused by hours of sitting.",
    },
    Entry {
        name: "Seated Leg Extensions",
        category: Category::Knees,
        posture: Posture::Seated,
        standing_recommended: true,
        compatibility: Compatibility::Both,
        instructions: [
            "Sit back in your chair.",
            "Straighten one leg and flex your toes toward you.",
            "Hold for 3s, lower slowly. Switch legs every 5 reps.",
        ],
        benefits: "Strengthens the VMO (inner quad) for patellar tracking.",
        prevention: "Prevents 'Runner's Knee' and patellofemoral pain.",
    },
    Entry {
        name: "Ankle Alphabet",
        category: Category::Ankles,
        posture: Posture::Seated,
        standing_recommended: true,
        compatibility: Compatibility::Both,
        instructions: [
            "Lift one foot off the floor.",
            "Use your big toe to draw the letters A-Z in the air.",
            "Switch feet after the letter M.",
        ],
        benefits: "Mobilizes the ankle in all planes of motion.",
        prevention: "Prevents ankle instability and improves circulation.",
    },
    Entry {
        name: "Seated Calf Pumps",
        category: Category::Ankles,
        posture: Posture::Seated,
        standing_recommended: true,
        compatibility: Compatibility::Both,
        instructions: [
            "Keep your toes on the floor and lift your heels high.",
            "Then keep your heels down and lift your toes high.",
            "Alternate rapidly for 60 seconds.",
        ],
        benefits: "Activates the calf muscles, the body's 'second heart'.",
        prevention: "Prevents deep vein thrombosis (DVT) and lower leg swelling.",
    },
    Entry {
        name: "Ulnar Nerve Glide",
        category: Category::Elbows,
        posture: Posture::Seated,
        standing_recommended: true,
        compatibility: Compatibility::Both,
        instructions: [
            "Make an 'OK' sign with fingers.",
            "Flip the hand upside down and place over your eye like a mask.",
            "Slowly point elbow away. 30s per side.",
        ],
        benefits: "Releases the nerve that causes 'funny bone' pain.",
        prevention: "Prevents Cubital Tunnel Syndrome.",
    },
];

impl Entry {
    fn to_exercise(&self) -> Exercise {
        Exercise {
            name: self.name.to_string(),
            duration_seconds: 60,
            instructions: self.instructions.iter().map(|s| s.to_string()).collect(),
            benefits: self.benefits.to_string(),
            prevention: self.prevention.to_string(),
            category: self.category,
            posture: self.posture,
            is_standing_recommended: self.standing_recommended.then_some(true),
            equipment: None,
            environment_compatibility: self.compatibility,
        }
    }
}

/// The built-in library, materialized once.
pub fn builtin() -> &'static [Exercise] {
    static LIBRARY: OnceLock<Vec<Exercise>> = OnceLock::new();
    LIBRARY.get_or_init(|| ENTRIES.iter().map(Entry::to_exercise).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::Environment;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = builtin().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names.len(), builtin().len());
    }

    #[test]
    fn covers_every_canonical_part() {
        for part in Category::CANONICAL {
            assert!(
                builtin().iter().any(|e| e.category == part),
                "no exercise for {part}"
            );
        }
    }

    #[test]
    fn office_pool_excludes_home_only() {
        let office: Vec<_> = builtin()
            .iter()
            .filter(|e| e.suits(Environment::Office))
            .collect();
        assert_eq!(office.len(), builtin().len() - 1);
        assert!(office.iter().all(|e| e.name != "Desk Wall Slides"));
    }
}
