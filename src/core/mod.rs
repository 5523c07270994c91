// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod skills;

pub use distance::{haversine_km, EARTH_RADIUS_KM};
pub use filters::{hospital_in_region, is_open, is_urgent_within, program_matches, ProgramFilter};
pub use matcher::{MatchResult, Matcher, RankedShift, MAX_RANKED_RESULTS};
pub use scoring::{score_breakdown, score_match, ScoreBreakdown, MAX_SCORE};
pub use skills::SkillSet;
