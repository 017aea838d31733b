//! The fixed candidates and roles of the board.

use core::fmt::{self, Display};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    President,
    #[serde(rename = "Vice President")]
    VicePresident,
    Treasurer,
    #[serde(rename = "Committee Head Coordinator")]
    CommitteeHeadCoordinator,
    #[serde(rename = "Small Group Coordinator")]
    SmallGroupCoordinator,
    #[serde(rename = "Praise Team Leaders")]
    PraiseTeamLeaders,
}

impl Role {
    /// In display order.
    pub const ALL: [Self; 6] = [
        Self::President,
        Self::VicePresident,
        Self::Treasurer,
        Self::CommitteeHeadCoordinator,
        Self::SmallGroupCoordinator,
        Self::PraiseTeamLeaders,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::President => "President",
            Self::VicePresident => "Vice President",
            Self::Treasurer => "Treasurer",
            Self::CommitteeHeadCoordinator => "Committee Head Coordinator",
            Self::SmallGroupCoordinator => "Small Group Coordinator",
            Self::PraiseTeamLeaders => "Praise Team Leaders",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.name() == value)
            .ok_or_else(|| UnknownRole(value.to_owned()))
    }
}

/// The group a candidate comes from. Only affects styling.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Category {
    Eboard,
    CommitteeHead,
    SmallGroupLeader,
    PraiseTeam,
}

impl Category {
    pub const ALL: [Self; 4] = [
        Self::Eboard,
        Self::CommitteeHead,
        Self::SmallGroupLeader,
        Self::PraiseTeam,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eboard => "Eboard",
            Self::CommitteeHead => "Committee Head",
            Self::SmallGroupLeader => "Small Group Leader",
            Self::PraiseTeam => "Praise Team",
        }
    }

    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Eboard => "eboard",
            Self::CommitteeHead => "committee-head",
            Self::SmallGroupLeader => "small-group-leader",
            Self::PraiseTeam => "praise-team",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type CandidateId = u32;

#[derive(Debug, PartialEq, Eq)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: &'static str,
    pub category: Category,
    pub eligible_roles: &'static [Role],
}

impl Candidate {
    #[must_use]
    pub fn is_eligible_for(&self, role: Role) -> bool {
        self.eligible_roles.contains(&role)
    }
}

use Role::{
    CommitteeHeadCoordinator, PraiseTeamLeaders, President, SmallGroupCoordinator, Treasurer,
    VicePresident,
};

const EXECUTIVE_AND_COMMITTEE: &[Role] =
    &[President, VicePresident, Treasurer, CommitteeHeadCoordinator];
const EXECUTIVE_COMMITTEE_AND_PRAISE: &[Role] = &[
    President,
    VicePresident,
    Treasurer,
    CommitteeHeadCoordinator,
    PraiseTeamLeaders,
];
const EXECUTIVE_AND_SMALL_GROUP: &[Role] =
    &[President, VicePresident, Treasurer, SmallGroupCoordinator];

/// In display order. Ids are unique but not contiguous.
pub static CANDIDATES: [Candidate; 15] = [
    Candidate {
        id: 1,
        name: "Brandon",
        category: Category::Eboard,
        eligible_roles: EXECUTIVE_AND_COMMITTEE,
    },
    Candidate {
        id: 2,
        name: "Caleb",
        category: Category::CommitteeHead,
        eligible_roles: EXECUTIVE_COMMITTEE_AND_PRAISE,
    },
    Candidate {
        id: 3,
        name: "Jefferson",
        category: Category::CommitteeHead,
        eligible_roles: EXECUTIVE_COMMITTEE_AND_PRAISE,
    },
    Candidate {
        id: 4,
        name: "Josh",
        category: Category::CommitteeHead,
        eligible_roles: EXECUTIVE_AND_COMMITTEE,
    },
    Candidate {
        id: 5,
        name: "Mina",
        category: Category::Eboard,
        eligible_roles: &[VicePresident, PraiseTeamLeaders],
    },
    Candidate {
        id: 7,
        name: "Nathan",
        category: Category::Eboard,
        eligible_roles: &[Treasurer],
    },
    Candidate {
        id: 8,
        name: "Paul",
        category: Category::SmallGroupLeader,
        eligible_roles: &[SmallGroupCoordinator],
    },
    Candidate {
        id: 9,
        name: "Rebecca",
        category: Category::SmallGroupLeader,
        eligible_roles: EXECUTIVE_AND_SMALL_GROUP,
    },
    Candidate {
        id: 10,
        name: "Sean",
        category: Category::SmallGroupLeader,
        eligible_roles: EXECUTIVE_AND_SMALL_GROUP,
    },
    Candidate {
        id: 11,
        name: "Serena",
        category: Category::SmallGroupLeader,
        eligible_roles: EXECUTIVE_AND_SMALL_GROUP,
    },
    Candidate {
        id: 12,
        name: "Sophia",
        category: Category::CommitteeHead,
        eligible_roles: EXECUTIVE_AND_COMMITTEE,
    },
    Candidate {
        id: 13,
        name: "Yong",
        category: Category::SmallGroupLeader,
        eligible_roles: EXECUTIVE_AND_SMALL_GROUP,
    },
    Candidate {
        id: 14,
        name: "Chris",
        category: Category::PraiseTeam,
        eligible_roles: &[PraiseTeamLeaders],
    },
    Candidate {
        id: 15,
        name: "Kenny",
        category: Category::PraiseTeam,
        eligible_roles: &[PraiseTeamLeaders],
    },
    Candidate {
        id: 16,
        name: "Will",
        category: Category::PraiseTeam,
        eligible_roles: &[PraiseTeamLeaders],
    },
];

#[must_use]
pub fn candidate(id: CandidateId) -> Option<&'static Candidate> {
    CANDIDATES.iter().find(|candidate| candidate.id == id)
}

#[must_use]
pub fn candidate_by_name(name: &str) -> Option<&'static Candidate> {
    CANDIDATES.iter().find(|candidate| candidate.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{candidate, Category, Role, CANDIDATES};

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = CANDIDATES.iter().map(|candidate| candidate.id).collect();
        assert_eq!(ids.len(), CANDIDATES.len());
        assert!(candidate(6).is_none());
    }

    #[test]
    fn every_role_can_be_filled() {
        for role in Role::ALL {
            assert!(
                CANDIDATES.iter().any(|candidate| candidate.is_eligible_for(role)),
                "{role} has no eligible candidate"
            );
        }
    }

    #[test]
    fn names_parse_back() {
        for role in Role::ALL {
            assert_eq!(role.name().parse::<Role>(), Ok(role));
            assert_eq!(
                serde_json::to_string(&role).unwrap(),
                format!("\"{}\"", role.name())
            );
        }
        assert!("Secretary".parse::<Role>().is_err());
    }

    #[test]
    fn css_class_is_kebab_case_name() {
        for category in Category::ALL {
            assert_eq!(
                category.css_class(),
                category.name().to_lowercase().replace(' ', "-")
            );
        }
    }
}
