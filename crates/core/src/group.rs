use crate::context::Context;
use crate::error::{HardenError, MemberFailure};
use crate::item::{Hardening, Identity};
use crate::mode::Mode;
use harden_domain::policy::GroupAggregation;

/// Several toggles under one name and default policy.
///
/// `harden` runs every member in order and never stops early; all member failures are
/// reported together. The hardened state is derived from the members according to the
/// group's [`GroupAggregation`].
#[derive(Debug)]
pub struct HardeningGroup {
    identity: Identity,
    members: Vec<Box<dyn Hardening>>,
    aggregation: GroupAggregation,
}

impl HardeningGroup {
    /// # Errors
    /// Returns [`HardenError::EmptyGroup`] if `members` is empty.
    pub fn new(identity: Identity, members: Vec<Box<dyn Hardening>>) -> Result<Self, HardenError> {
        if members.is_empty() {
            return Err(HardenError::EmptyGroup {
                message: identity.name().to_owned().into(),
                context: None,
            });
        }
        Ok(Self { identity, members, aggregation: GroupAggregation::default() })
    }

    #[must_use = "Sets how member states combine into the group state"]
    pub fn with_aggregation(mut self, aggregation: GroupAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    #[must_use]
    pub fn members(&self) -> &[Box<dyn Hardening>] {
        &self.members
    }

    #[must_use]
    pub const fn aggregation(&self) -> GroupAggregation {
        self.aggregation
    }
}

impl Hardening for HardeningGroup {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn harden(&self, ctx: &Context<'_>, enable: bool) -> Result<(), HardenError> {
        let failures: Vec<MemberFailure> = self
            .members
            .iter()
            .filter_map(|member| {
                member.harden(ctx, enable).err().map(|error| MemberFailure {
                    member: member.name().to_owned().into(),
                    error,
                })
            })
            .collect();

        if failures.is_empty() {
            return Ok(());
        }
        Err(HardenError::Group {
            group: self.name().to_owned().into(),
            mode: Mode::from_enable(enable),
            failures,
            context: None,
        })
    }

    fn is_hardened(&self, ctx: &Context<'_>) -> bool {
        self.aggregation.combine(self.members.iter().map(|member| member.is_hardened(ctx)))
    }
}
