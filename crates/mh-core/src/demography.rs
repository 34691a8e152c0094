//! Static demographic traits.

/// Housing classification.  Informal settlements carry higher chronic stress.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Settlement {
    Informal,
    #[default]
    Formal,
}

impl Settlement {
    #[inline]
    pub fn is_informal(self) -> bool {
        matches!(self, Settlement::Informal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Settlement::Informal => "informal",
            Settlement::Formal   => "formal",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male   => "male",
        }
    }
}
