//! The region: exclusive owner of every entity in one simulation run.
//!
//! A [`Region`] stores industries, people, population segments, resources,
//! and problems in insertion order. That order is the iteration order used
//! by every phase of the tick cycle, which is what makes runs reproducible.
//!
//! # Identifiers
//!
//! Each collection has its own [`IdAllocator`]. Registration hands out the
//! next ID and stores the entity; IDs are never reused.
//!
//! # Borrowing
//!
//! Tick phases need to move money between an industry and several people,
//! or between a person, an industry, and a product, in one step.
//! [`Region::parts_mut`] splits the region into disjoint mutable slices so
//! those transfers can borrow each collection independently.

use std::collections::BTreeSet;

use mercat_types::{
    Entity, IdAllocator, Industry, IndustryId, NewIndustry, NewPerson, NewProblem, NewResource,
    NewSegment, Person, PersonId, PopulationSegment, Problem, ProblemId, Resource, ResourceId,
    SegmentId, find, find_by_name, find_mut,
};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::WorldError;

/// Disjoint mutable views of a region's mutable collections.
#[derive(Debug)]
pub struct RegionParts<'a> {
    /// All industries, in region order.
    pub industries: &'a mut [Industry],
    /// All people, in region order.
    pub people: &'a mut [Person],
    /// All resources, in region order.
    pub resources: &'a mut [Resource],
    /// All problems, read-only during a tick.
    pub problems: &'a [Problem],
    /// All population segments, read-only during a tick.
    pub segments: &'a [PopulationSegment],
}

/// A bounded economic area owning all simulation entities.
#[derive(Debug, Clone, Default)]
pub struct Region {
    /// Region name.
    name: String,
    /// Free-form description.
    description: String,
    /// Industries in registration order.
    industries: Vec<Industry>,
    /// People in registration order.
    people: Vec<Person>,
    /// Resources in registration order.
    resources: Vec<Resource>,
    /// Problems in registration order.
    problems: Vec<Problem>,
    /// Population segments in registration order.
    segments: Vec<PopulationSegment>,
    /// ID allocator for industries.
    industry_ids: IdAllocator<IndustryId>,
    /// ID allocator for people.
    person_ids: IdAllocator<PersonId>,
    /// ID allocator for resources.
    resource_ids: IdAllocator<ResourceId>,
    /// ID allocator for problems.
    problem_ids: IdAllocator<ProblemId>,
    /// ID allocator for segments.
    segment_ids: IdAllocator<SegmentId>,
}

impl Region {
    /// Create an empty region.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Region description.
    pub fn description(&self) -> &str {
        &self.description
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register a problem.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::IdSpaceExhausted`] when no ID is left.
    pub fn add_problem(&mut self, desc: NewProblem) -> Result<ProblemId, WorldError> {
        let id = self
            .problem_ids
            .allocate()
            .ok_or(WorldError::IdSpaceExhausted("problem"))?;
        debug!(%id, name = %desc.name, "Problem registered");
        self.problems.push(Problem::new(id, desc));
        Ok(id)
    }

    /// Register a resource.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NegativeAmount`] for a negative starting
    /// quantity or regeneration rate.
    pub fn add_resource(&mut self, desc: NewResource) -> Result<ResourceId, WorldError> {
        non_negative(&desc.name, "quantity", desc.quantity)?;
        non_negative(&desc.name, "regeneration_rate", desc.regeneration_rate)?;
        let id = self
            .resource_ids
            .allocate()
            .ok_or(WorldError::IdSpaceExhausted("resource"))?;
        debug!(%id, name = %desc.name, quantity = %desc.quantity, "Resource registered");
        self.resources.push(Resource::new(id, desc));
        Ok(id)
    }

    /// Register a population segment.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ProblemNotFound`] if the segment lists a
    /// problem this region does not hold.
    pub fn add_segment(&mut self, desc: NewSegment) -> Result<SegmentId, WorldError> {
        for &problem in &desc.problems {
            self.require_problem(problem)?;
        }
        let id = self
            .segment_ids
            .allocate()
            .ok_or(WorldError::IdSpaceExhausted("segment"))?;
        debug!(%id, name = %desc.name, "Segment registered");
        self.segments.push(PopulationSegment::new(id, desc));
        Ok(id)
    }

    /// Register a person.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::SegmentNotFound`] for an unknown segment, or
    /// [`WorldError::NegativeAmount`] for negative money or labor hours.
    pub fn add_person(&mut self, desc: NewPerson) -> Result<PersonId, WorldError> {
        non_negative(&desc.name, "money", desc.money)?;
        non_negative(&desc.name, "labor_hours", desc.labor_hours)?;
        for &segment in &desc.segments {
            if find(&self.segments, segment).is_none() {
                return Err(WorldError::SegmentNotFound(segment));
            }
        }
        let id = self
            .person_ids
            .allocate()
            .ok_or(WorldError::IdSpaceExhausted("person"))?;
        self.people.push(Person::new(id, desc));
        Ok(id)
    }

    /// Register an industry.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for any unknown problem or resource, or
    /// [`WorldError::NegativeAmount`] for negative starting capital.
    pub fn add_industry(&mut self, desc: NewIndustry) -> Result<IndustryId, WorldError> {
        non_negative(&desc.name, "initial_capital", desc.initial_capital)?;
        for &problem in &desc.solved_problems {
            self.require_problem(problem)?;
        }
        for &resource in desc.inputs.iter().chain(&desc.outputs) {
            if find(&self.resources, resource).is_none() {
                return Err(WorldError::ResourceNotFound(resource));
            }
        }
        let id = self
            .industry_ids
            .allocate()
            .ok_or(WorldError::IdSpaceExhausted("industry"))?;
        debug!(%id, name = %desc.name, labor_needed = desc.labor_needed, "Industry registered");
        self.industries.push(Industry::new(id, desc));
        Ok(id)
    }

    fn require_problem(&self, problem: ProblemId) -> Result<(), WorldError> {
        find(&self.problems, problem)
            .map(|_| ())
            .ok_or(WorldError::ProblemNotFound(problem))
    }

    // -----------------------------------------------------------------------
    // Collections
    // -----------------------------------------------------------------------

    /// All industries, in region order.
    pub fn industries(&self) -> &[Industry] {
        &self.industries
    }

    /// All people, in region order.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// All resources, in region order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// All problems, in region order.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// All population segments, in region order.
    pub fn segments(&self) -> &[PopulationSegment] {
        &self.segments
    }

    /// Split the region into disjoint mutable views.
    pub fn parts_mut(&mut self) -> RegionParts<'_> {
        RegionParts {
            industries: &mut self.industries,
            people: &mut self.people,
            resources: &mut self.resources,
            problems: &self.problems,
            segments: &self.segments,
        }
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Industry by ID.
    pub fn industry(&self, id: IndustryId) -> Option<&Industry> {
        find(&self.industries, id)
    }

    /// Industry by ID, mutably.
    pub fn industry_mut(&mut self, id: IndustryId) -> Option<&mut Industry> {
        find_mut(&mut self.industries, id)
    }

    /// Person by ID.
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        find(&self.people, id)
    }

    /// Person by ID, mutably.
    pub fn person_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        find_mut(&mut self.people, id)
    }

    /// Resource by ID.
    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        find(&self.resources, id)
    }

    /// Resource by ID, mutably.
    pub fn resource_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        find_mut(&mut self.resources, id)
    }

    /// Problem by ID.
    pub fn problem(&self, id: ProblemId) -> Option<&Problem> {
        find(&self.problems, id)
    }

    /// Problem by ID, mutably (for demand updates between runs).
    pub fn problem_mut(&mut self, id: ProblemId) -> Option<&mut Problem> {
        find_mut(&mut self.problems, id)
    }

    /// Segment by ID.
    pub fn segment(&self, id: SegmentId) -> Option<&PopulationSegment> {
        find(&self.segments, id)
    }

    /// Segment by ID, mutably (for size bookkeeping).
    pub fn segment_mut(&mut self, id: SegmentId) -> Option<&mut PopulationSegment> {
        find_mut(&mut self.segments, id)
    }

    /// First industry with the given name.
    pub fn industry_by_name(&self, name: &str) -> Option<&Industry> {
        find_by_name(&self.industries, name)
    }

    /// First resource with the given name.
    pub fn resource_by_name(&self, name: &str) -> Option<&Resource> {
        find_by_name(&self.resources, name)
    }

    /// First problem with the given name.
    pub fn problem_by_name(&self, name: &str) -> Option<&Problem> {
        find_by_name(&self.problems, name)
    }

    /// First segment with the given name.
    pub fn segment_by_name(&self, name: &str) -> Option<&PopulationSegment> {
        find_by_name(&self.segments, name)
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    /// A person's effective need set.
    ///
    /// The union of the problem sets of every segment the person belongs
    /// to, deduplicated by problem name and ordered by first appearance.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PersonNotFound`] for an unknown person.
    pub fn effective_needs(&self, person: PersonId) -> Result<Vec<ProblemId>, WorldError> {
        let person = self
            .person(person)
            .ok_or(WorldError::PersonNotFound(person))?;
        Ok(effective_needs_of(person, &self.segments, &self.problems))
    }

    /// IDs of all people belonging to any segment with the given name, in
    /// region order.
    pub fn members_of(&self, segment_name: &str) -> Vec<PersonId> {
        let segment_ids: Vec<SegmentId> = self
            .segments
            .iter()
            .filter(|s| s.name == segment_name)
            .map(|s| s.id)
            .collect();
        if segment_ids.is_empty() {
            return Vec::new();
        }
        self.people
            .iter()
            .filter(|p| p.segments.iter().any(|s| segment_ids.contains(s)))
            .map(|p| p.id)
            .collect()
    }

    /// Sum of all industry treasuries.
    pub fn industry_wealth(&self) -> Decimal {
        self.industries
            .iter()
            .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.money))
    }

    /// Sum of all personal wealth.
    pub fn people_wealth(&self) -> Decimal {
        self.people
            .iter()
            .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.money))
    }

    /// All money in the region: industries plus people.
    pub fn total_wealth(&self) -> Decimal {
        self.industry_wealth().saturating_add(self.people_wealth())
    }
}

/// Effective need set of one person against the given collections.
///
/// Shared by [`Region::effective_needs`] and callers that hold a
/// [`RegionParts`] borrow. Unknown segment or problem IDs are skipped.
pub fn effective_needs_of(
    person: &Person,
    segments: &[PopulationSegment],
    problems: &[Problem],
) -> Vec<ProblemId> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut needs = Vec::new();
    for &segment_id in &person.segments {
        let Some(segment) = find(segments, segment_id) else {
            continue;
        };
        for &problem_id in &segment.problems {
            let Some(problem) = find(problems, problem_id) else {
                continue;
            };
            if seen.insert(problem.name()) {
                needs.push(problem.id);
            }
        }
    }
    needs
}

fn non_negative(entity: &str, field: &'static str, amount: Decimal) -> Result<(), WorldError> {
    if amount < Decimal::ZERO {
        return Err(WorldError::NegativeAmount {
            entity: entity.to_owned(),
            field,
            amount,
        });
    }
    Ok(())
}
