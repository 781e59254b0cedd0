//src/render.rs
use crate::form::EntryForm;
use crate::program::{Exercise, ExerciseId, Program, Section};
use crate::store::EntryStore;
use crate::view::EntryListView;

/// One exercise with its entry table and its input form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseCard {
    pub id: ExerciseId,
    pub exercise: Exercise,
    pub list: EntryListView,
    pub form: EntryForm,
}

impl ExerciseCard {
    fn new(id: ExerciseId, exercise: &Exercise, store: &EntryStore) -> Self {
        let mut list = EntryListView::new(id);
        list.refresh(store);
        Self {
            id,
            exercise: exercise.clone(),
            list,
            form: EntryForm::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionView {
    MainLift(ExerciseCard),
    Superset {
        label: String,
        cards: Vec<ExerciseCard>,
    },
}

impl SectionView {
    pub fn cards(&self) -> &[ExerciseCard] {
        match self {
            Self::MainLift(card) => std::slice::from_ref(card),
            Self::Superset { cards, .. } => cards,
        }
    }

    fn cards_mut(&mut self) -> &mut [ExerciseCard] {
        match self {
            Self::MainLift(card) => std::slice::from_mut(card),
            Self::Superset { cards, .. } => cards,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub title: String,
    pub sections: Vec<SectionView>,
}

impl DayView {
    pub fn cards(&self) -> impl Iterator<Item = &ExerciseCard> {
        self.sections.iter().flat_map(SectionView::cards)
    }
}

/// The rendered program: the container every exercise card lives in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramView {
    pub days: Vec<DayView>,
}

impl ProgramView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throws away any previous output and builds one card per exercise,
    /// each refreshed from the store. Only reads from the store.
    pub fn render(&mut self, program: &Program, store: &EntryStore) {
        self.days.clear();

        for (day_idx, day) in program.days.iter().enumerate() {
            let sections = day
                .sections
                .iter()
                .enumerate()
                .map(|(section_idx, section)| {
                    let card = |(ex_idx, exercise): (usize, &Exercise)| {
                        ExerciseCard::new(
                            ExerciseId::new(day_idx, section_idx, ex_idx),
                            exercise,
                            store,
                        )
                    };
                    match section {
                        Section::MainLift(exercise) => SectionView::MainLift(card((0, exercise))),
                        Section::Superset { exercises, .. } => SectionView::Superset {
                            label: section.group_label().unwrap_or("Superset").to_string(),
                            cards: exercises.iter().enumerate().map(card).collect(),
                        },
                    }
                })
                .collect();

            self.days.push(DayView {
                title: day.title(),
                sections,
            });
        }
        tracing::debug!(days = self.days.len(), cards = self.cards().count(), "rendered program");
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn cards(&self) -> impl Iterator<Item = &ExerciseCard> {
        self.days.iter().flat_map(DayView::cards)
    }

    pub fn card(&self, id: ExerciseId) -> Option<&ExerciseCard> {
        self.cards().find(|c| c.id == id)
    }

    /// Refreshes every card backed by the same storage slot as `id`. After a
    /// mutation in the flat layout that is every card, not just the one that
    /// triggered it.
    pub fn refresh_slot(&mut self, store: &EntryStore, id: ExerciseId) {
        let slot = store.slot_key(&id);
        let mut refreshed = 0;
        for card in self
            .days
            .iter_mut()
            .flat_map(|day| day.sections.iter_mut())
            .flat_map(SectionView::cards_mut)
        {
            if store.slot_key(&card.id) == slot {
                card.list.refresh(store);
                refreshed += 1;
            }
        }
        tracing::debug!(%id, %slot, refreshed, "refreshed cards sharing a slot");
    }

    pub fn card_mut(&mut self, id: ExerciseId) -> Option<&mut ExerciseCard> {
        self.days
            .get_mut(id.day)?
            .sections
            .get_mut(id.section)?
            .cards_mut()
            .get_mut(id.exercise)
    }
}
