//! Integration tests for the full command pipeline.
//!
//! Tests: Command → Dispatcher → Roster/History → ChangeNotifier
//!
//! Verifies:
//! - Atomic execute → commit → notify (failures have zero side effects)
//! - Undo/redo round-trips restore structural equality
//! - Index resolution goes through the live filtered view
//! - Notification ordering and selection lifecycle

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    use markbook_core::{AssignmentId, DisplayIndex, DomainError, PersonHandle};
    use markbook_events::{ChangeNotifier, RosterEvent};
    use markbook_roster::{
        Assignment, AssignmentName, ContactInfo, Mark, MaxMark, Note, Person, PersonName,
        Roster, Weight,
    };

    use crate::command::{Command, PersonEdits};
    use crate::dispatcher::CommandDispatcher;
    use crate::history::History;

    fn handle(s: &str) -> PersonHandle {
        PersonHandle::new(s).unwrap()
    }

    fn person(h: &str, name: &str) -> Person {
        Person::new(
            handle(h),
            PersonName::new(name).unwrap(),
            ContactInfo::default(),
        )
    }

    fn assignment(name: &str, weight: f64, max: f64) -> Assignment {
        Assignment::new(
            AssignmentId::new(),
            AssignmentName::new(name).unwrap(),
            Utc.with_ymd_and_hms(2018, 11, 9, 23, 59, 0).unwrap(),
            Weight::new(weight).unwrap(),
            MaxMark::new(max).unwrap(),
        )
    }

    fn index(one_based: usize) -> DisplayIndex {
        DisplayIndex::from_one_based(one_based).unwrap()
    }

    /// Roster with Alice (A1) and the Midterm assignment (weight 30,
    /// max 100); returns the assignment id for mark commands.
    fn typical_roster() -> (Roster, AssignmentId) {
        let mut roster = Roster::new();
        roster.add_person(person("A1", "Alice Tan")).unwrap();
        let midterm = assignment("Midterm", 30.0, 100.0);
        let id = midterm.id_typed();
        roster.add_assignment(midterm).unwrap();
        (roster, id)
    }

    fn setup(roster: Roster) -> (CommandDispatcher, Arc<Mutex<Vec<RosterEvent>>>) {
        let notifier = Arc::new(ChangeNotifier::new());
        let events: Arc<Mutex<Vec<RosterEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        notifier.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        let dispatcher = CommandDispatcher::new(roster, History::new(), notifier);
        (dispatcher, events)
    }

    fn events_of(log: &Arc<Mutex<Vec<RosterEvent>>>) -> Vec<RosterEvent> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn set_note_round_trip_fires_one_roster_changed() {
        let (roster, _) = typical_roster();
        let (mut dispatcher, events) = setup(roster);

        let outcome = dispatcher
            .run(Command::SetNote {
                index: index(1),
                note: Note::new("great progress"),
            })
            .unwrap();
        assert_eq!(outcome.message(), "set note for person at 1");
        assert_eq!(events_of(&events), vec![RosterEvent::RosterChanged]);
        assert_eq!(
            dispatcher.roster().person(&handle("A1")).unwrap().note().as_str(),
            "great progress"
        );

        dispatcher.undo_last().unwrap();
        assert!(
            dispatcher
                .roster()
                .person(&handle("A1"))
                .unwrap()
                .note()
                .is_empty()
        );

        dispatcher.redo_last().unwrap();
        assert_eq!(
            dispatcher.roster().person(&handle("A1")).unwrap().note().as_str(),
            "great progress"
        );
    }

    #[test]
    fn n_commands_then_n_undos_restore_the_initial_roster() {
        let (roster, midterm) = typical_roster();
        let initial = roster.clone();
        let (mut dispatcher, _) = setup(roster);

        let commands = vec![
            Command::AddPerson {
                person: person("B2", "Ben Lee"),
            },
            Command::RecordMark {
                index: index(1),
                assignment: midterm,
                value: Mark::new(68.5).unwrap(),
            },
            Command::EditPerson {
                index: index(2),
                edits: PersonEdits {
                    name: Some(PersonName::new("Benjamin Lee").unwrap()),
                    ..PersonEdits::default()
                },
            },
            Command::DeleteAssignment { id: midterm },
            Command::ClearRoster,
        ];
        let count = commands.len();
        for command in commands {
            dispatcher.run(command).unwrap();
        }
        assert!(dispatcher.roster().is_empty());

        for _ in 0..count {
            dispatcher.undo_last().unwrap();
        }
        assert_eq!(dispatcher.roster(), &initial);
    }

    #[test]
    fn undo_k_then_redo_k_returns_to_the_pre_undo_state() {
        let (roster, midterm) = typical_roster();
        let (mut dispatcher, _) = setup(roster);

        dispatcher
            .run(Command::AddPerson {
                person: person("B2", "Ben Lee"),
            })
            .unwrap();
        dispatcher
            .run(Command::RecordMark {
                index: index(1),
                assignment: midterm,
                value: Mark::new(40.0).unwrap(),
            })
            .unwrap();
        dispatcher
            .run(Command::SetNote {
                index: index(2),
                note: Note::new("slipping"),
            })
            .unwrap();
        let latest = dispatcher.roster().clone();

        for k in 1..=3usize {
            for _ in 0..k {
                dispatcher.undo_last().unwrap();
            }
            for _ in 0..k {
                dispatcher.redo_last().unwrap();
            }
            assert_eq!(dispatcher.roster(), &latest, "round trip of depth {k}");
        }
    }

    #[test]
    fn committing_discards_the_redo_branch() {
        let (roster, _) = typical_roster();
        let (mut dispatcher, _) = setup(roster);

        dispatcher
            .run(Command::SetNote {
                index: index(1),
                note: Note::new("first"),
            })
            .unwrap();
        dispatcher.undo_last().unwrap();
        assert_eq!(dispatcher.history().redo_depth(), 1);

        dispatcher
            .run(Command::SetNote {
                index: index(1),
                note: Note::new("second"),
            })
            .unwrap();
        assert_eq!(
            dispatcher.redo_last().unwrap_err(),
            DomainError::EmptyHistory("redo")
        );
    }

    #[test]
    fn failed_commands_leave_no_trace() {
        let (roster, midterm) = typical_roster();
        let snapshot = roster.clone();
        let (mut dispatcher, events) = setup(roster);

        // Mark above the maximum: validation failure.
        let err = dispatcher
            .run(Command::RecordMark {
                index: index(1),
                assignment: midterm,
                value: Mark::new(100.5).unwrap(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // Index out of range: resolution failure.
        let err = dispatcher
            .run(Command::DeletePerson { index: index(7) })
            .unwrap_err();
        assert_eq!(err, DomainError::IndexOutOfRange { index: 7, size: 1 });

        assert_eq!(dispatcher.roster(), &snapshot);
        assert_eq!(dispatcher.history().undo_depth(), 0);
        assert!(events_of(&events).is_empty());
    }

    #[test]
    fn filtered_view_bounds_index_resolution() {
        let mut roster = Roster::new();
        for (h, name) in [
            ("A1", "Alice Tan"),
            ("B2", "Ben Lee"),
            ("C3", "Carol Ng"),
            ("D4", "Dan Ho"),
            ("E5", "Eve Lee"),
        ] {
            roster.add_person(person(h, name)).unwrap();
        }
        let (mut dispatcher, _) = setup(roster);

        let outcome = dispatcher
            .run(Command::Find {
                keywords: vec!["Lee".to_string()],
            })
            .unwrap();
        assert_eq!(outcome.message(), "2 persons listed");

        // Five persons on the roster, two visible: index 3 must fail.
        let err = dispatcher
            .run(Command::SetNote {
                index: index(3),
                note: Note::new("unreachable"),
            })
            .unwrap_err();
        assert_eq!(err, DomainError::IndexOutOfRange { index: 3, size: 2 });
    }

    #[test]
    fn commands_address_the_filtered_view_not_the_roster() {
        let mut roster = Roster::new();
        roster.add_person(person("A1", "Alice Tan")).unwrap();
        roster.add_person(person("B2", "Ben Lee")).unwrap();
        let (mut dispatcher, _) = setup(roster);

        dispatcher
            .run(Command::Find {
                keywords: vec!["Ben".to_string()],
            })
            .unwrap();
        dispatcher.run(Command::DeletePerson { index: index(1) }).unwrap();

        // Index 1 of the filtered view was Ben, not Alice.
        assert!(dispatcher.roster().person(&handle("B2")).is_none());
        assert!(dispatcher.roster().person(&handle("A1")).is_some());

        // Undo restores Ben even after the filter is gone.
        dispatcher.run(Command::List).unwrap();
        dispatcher.undo_last().unwrap();
        assert!(dispatcher.roster().person(&handle("B2")).is_some());
    }

    #[test]
    fn read_only_commands_never_enter_history() {
        let (roster, _) = typical_roster();
        let (mut dispatcher, _) = setup(roster);

        dispatcher.run(Command::List).unwrap();
        dispatcher
            .run(Command::Find {
                keywords: vec!["Alice".to_string()],
            })
            .unwrap();
        dispatcher.run(Command::Select { index: index(1) }).unwrap();

        assert_eq!(dispatcher.history().undo_depth(), 0);
        assert_eq!(
            dispatcher.undo_last().unwrap_err(),
            DomainError::EmptyHistory("undo")
        );
    }

    #[test]
    fn select_publishes_selection_changed() {
        let (roster, _) = typical_roster();
        let (mut dispatcher, events) = setup(roster);

        dispatcher.run(Command::Select { index: index(1) }).unwrap();
        assert_eq!(
            events_of(&events),
            vec![RosterEvent::SelectionChanged {
                selected: Some(handle("A1"))
            }]
        );
        assert_eq!(dispatcher.selected().unwrap().handle(), &handle("A1"));
    }

    #[test]
    fn deleting_the_selected_person_clears_the_selection() {
        let (roster, _) = typical_roster();
        let (mut dispatcher, events) = setup(roster);

        dispatcher.run(Command::Select { index: index(1) }).unwrap();
        dispatcher.run(Command::DeletePerson { index: index(1) }).unwrap();

        assert!(dispatcher.selected().is_none());
        // RosterChanged first, then the deferred selection clear.
        assert_eq!(
            events_of(&events),
            vec![
                RosterEvent::SelectionChanged {
                    selected: Some(handle("A1"))
                },
                RosterEvent::RosterChanged,
                RosterEvent::SelectionChanged { selected: None },
            ]
        );
    }

    #[test]
    fn clear_roster_round_trips_through_undo() {
        let (mut roster, midterm) = typical_roster();
        roster.add_person(person("B2", "Ben Lee")).unwrap();
        let marked = roster
            .person(&handle("B2"))
            .unwrap()
            .with_mark(midterm, Mark::new(55.0).unwrap());
        roster.replace_person(&handle("B2"), marked).unwrap();
        let populated = roster.clone();
        let (mut dispatcher, _) = setup(roster);

        dispatcher.run(Command::ClearRoster).unwrap();
        assert!(dispatcher.roster().is_empty());

        dispatcher.undo_last().unwrap();
        assert_eq!(dispatcher.roster(), &populated);
    }

    #[test]
    fn bounded_dispatcher_history_caps_undo_depth() {
        let (roster, _) = typical_roster();
        let notifier = Arc::new(ChangeNotifier::new());
        let mut dispatcher = CommandDispatcher::new(roster, History::bounded(1), notifier);

        for text in ["one", "two"] {
            dispatcher
                .run(Command::SetNote {
                    index: index(1),
                    note: Note::new(text),
                })
                .unwrap();
        }
        dispatcher.undo_last().unwrap();
        assert_eq!(
            dispatcher.undo_last().unwrap_err(),
            DomainError::EmptyHistory("undo")
        );
        // The evicted first note survives as the floor.
        assert_eq!(
            dispatcher.roster().person(&handle("A1")).unwrap().note().as_str(),
            "one"
        );
    }

    /// Builds a command from one fuzzed step. Steps may legitimately
    /// fail (duplicate handles, out-of-range indices, over-max marks);
    /// failures must leave no trace, successes must replay.
    fn step_command(op: u8, pick: u8, value: u8, midterm: AssignmentId) -> Command {
        let pool = ["F1", "F2", "F3", "F4"];
        match op % 6 {
            0 => Command::AddPerson {
                person: person(pool[pick as usize % pool.len()], "Fuzzed Person"),
            },
            1 => Command::DeletePerson {
                index: index(pick as usize % 5 + 1),
            },
            2 => Command::SetNote {
                index: index(pick as usize % 5 + 1),
                note: Note::new(format!("note {value}")),
            },
            3 => Command::RecordMark {
                index: index(pick as usize % 5 + 1),
                assignment: midterm,
                value: Mark::new(f64::from(value)).unwrap(),
            },
            4 => Command::EditPerson {
                index: index(pick as usize % 5 + 1),
                edits: PersonEdits {
                    name: Some(PersonName::new(format!("Renamed {value}")).unwrap()),
                    ..PersonEdits::default()
                },
            },
            _ => Command::ClearRoster,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 300,
            ..ProptestConfig::default()
        })]

        /// Property: for any command sequence, undoing every success
        /// restores the initial roster, and redoing them all restores
        /// the final one.
        #[test]
        fn undo_redo_replay_is_lossless(
            steps in proptest::collection::vec((0u8..6, 0u8..8, 0u8..=130), 1..20)
        ) {
            let (roster, midterm) = typical_roster();
            let initial = roster.clone();
            let (mut dispatcher, _) = setup(roster);

            let mut successes = 0usize;
            for (op, pick, value) in steps {
                let before = dispatcher.roster().clone();
                match dispatcher.run(step_command(op, pick, value, midterm)) {
                    Ok(_) => successes += 1,
                    Err(_) => prop_assert_eq!(dispatcher.roster(), &before),
                }
            }
            let last = dispatcher.roster().clone();

            for _ in 0..successes {
                dispatcher.undo_last().unwrap();
            }
            prop_assert_eq!(dispatcher.roster(), &initial);

            for _ in 0..successes {
                dispatcher.redo_last().unwrap();
            }
            prop_assert_eq!(dispatcher.roster(), &last);
        }
    }
}
