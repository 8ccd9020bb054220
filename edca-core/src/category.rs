use std::{fmt, ops::Index, str::FromStr};

/// EDCA access category.
///
/// The derived ordering is by category name (`Background`, `BestEffort`,
/// `Video`, `Voice`) and is only meant for deterministic tie-breaks; it
/// says nothing about channel-access priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessCategory {
    Background,
    BestEffort,
    Video,
    Voice,
}

impl AccessCategory {
    /// All categories, in name order.
    pub const ALL: [Self; 4] = [
        Self::Background,
        Self::BestEffort,
        Self::Video,
        Self::Voice,
    ];

    /// Decode the numeric code used on the command line
    /// (`0=BE, 1=BK, 2=VI, 3=VO`).
    ///
    /// ```
    /// # use edca_core::AccessCategory;
    /// assert_eq!(AccessCategory::from_code(2), Some(AccessCategory::Video));
    /// assert_eq!(AccessCategory::from_code(4), None);
    /// ```
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::BestEffort),
            1 => Some(Self::Background),
            2 => Some(Self::Video),
            3 => Some(Self::Voice),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::BestEffort => 0,
            Self::Background => 1,
            Self::Video => 2,
            Self::Voice => 3,
        }
    }

    /// The lower of the two TIDs (user priorities) mapped to this category.
    pub const fn low_tid(self) -> u8 {
        match self {
            Self::BestEffort => 0,
            Self::Background => 1,
            Self::Video => 4,
            Self::Voice => 6,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BestEffort => "BE",
            Self::Background => "BK",
            Self::Video => "VI",
            Self::Voice => "VO",
        }
    }
}

impl fmt::Display for AccessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown access category `{0}', expected one of BE, BK, VI, VO")]
pub struct AccessCategoryParseError(String);

impl FromStr for AccessCategory {
    type Err = AccessCategoryParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BE" => Ok(Self::BestEffort),
            "BK" => Ok(Self::Background),
            "VI" => Ok(Self::Video),
            "VO" => Ok(Self::Voice),
            _ => Err(AccessCategoryParseError(s.to_owned())),
        }
    }
}

/// One value per access category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerCategory<T> {
    pub best_effort: T,
    pub background: T,
    pub video: T,
    pub voice: T,
}

impl<T> PerCategory<T> {
    pub fn get(&self, category: AccessCategory) -> &T {
        match category {
            AccessCategory::BestEffort => &self.best_effort,
            AccessCategory::Background => &self.background,
            AccessCategory::Video => &self.video,
            AccessCategory::Voice => &self.voice,
        }
    }

    /// Apply `f` to every category, failing on the first error in
    /// [`AccessCategory::ALL`] order.
    pub fn try_map<U, E, F>(&self, mut f: F) -> Result<PerCategory<U>, E>
    where
        F: FnMut(AccessCategory, &T) -> Result<U, E>,
    {
        Ok(PerCategory {
            background: f(AccessCategory::Background, &self.background)?,
            best_effort: f(AccessCategory::BestEffort, &self.best_effort)?,
            video: f(AccessCategory::Video, &self.video)?,
            voice: f(AccessCategory::Voice, &self.voice)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (AccessCategory, &T)> {
        AccessCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}

impl<T> Index<AccessCategory> for PerCategory<T> {
    type Output = T;
    fn index(&self, category: AccessCategory) -> &Self::Output {
        self.get(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        for category in AccessCategory::ALL {
            assert_eq!(AccessCategory::from_code(category.code()), Some(category));
        }
    }

    #[test]
    fn user_priorities() {
        let tids: Vec<_> = AccessCategory::ALL.iter().map(|c| c.low_tid()).collect();
        assert_eq!(tids, vec![1, 0, 4, 6]);
    }

    #[test]
    fn name_order() {
        let mut shuffled = [
            AccessCategory::Voice,
            AccessCategory::BestEffort,
            AccessCategory::Video,
            AccessCategory::Background,
        ];
        shuffled.sort();
        assert_eq!(shuffled, AccessCategory::ALL);
    }

    #[test]
    fn parse_label() {
        assert_eq!("vo".parse::<AccessCategory>().unwrap(), AccessCategory::Voice);
        assert_eq!(" BK".parse::<AccessCategory>().unwrap(), AccessCategory::Background);
        assert!("AC_BE".parse::<AccessCategory>().is_err());
    }

    #[test]
    fn per_category_index() {
        let values = PerCategory {
            best_effort: 0,
            background: 1,
            video: 2,
            voice: 3,
        };
        for category in AccessCategory::ALL {
            assert_eq!(values[category], category.code());
        }
        assert_eq!(values.iter().count(), 4);
    }

    #[test]
    fn try_map_stops_at_first_error() {
        let values = PerCategory {
            best_effort: 1u8,
            background: 0,
            video: 0,
            voice: 1,
        };
        let mut seen = Vec::new();
        let result: Result<PerCategory<u8>, AccessCategory> = values.try_map(|category, v| {
            seen.push(category);
            if *v == 0 { Err(category) } else { Ok(*v) }
        });
        assert_eq!(result.unwrap_err(), AccessCategory::Background);
        assert_eq!(seen, vec![AccessCategory::Background]);
    }
}
