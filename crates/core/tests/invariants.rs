mod common;

use common::{ctx, list, raw_flag, raw_slots};
use harden_core::{HardenError, Hardening, Identity, ListError, ListItem, RecordingSink};
use harden_domain::policy::DuplicatePolicy;
use harden_hive::MemoryHive;
use proptest::prelude::*;

const VALUES: [&str; 4] = ["cmd.exe", "powershell.exe", "powershell_ise.exe", "wscript.exe"];

#[derive(Debug, Clone)]
enum Step {
    Apply(usize),
    Restore(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![(0..VALUES.len()).prop_map(Step::Apply), (0..VALUES.len()).prop_map(Step::Restore)]
}

fn policy() -> impl Strategy<Value = DuplicatePolicy> {
    prop_oneof![Just(DuplicatePolicy::Skip), Just(DuplicatePolicy::Append)]
}

proptest! {
    #[test]
    fn list_stays_contiguous_and_flag_tracks_emptiness(
        steps in prop::collection::vec(step(), 1..40),
        duplicates in policy(),
        bound in 2u32..8,
    ) {
        let hive = MemoryHive::new();
        let sink = RecordingSink::new();
        let ctx = ctx(&hive, &sink);
        let list = list(bound);
        let items: Vec<ListItem> = VALUES
            .iter()
            .map(|&v| ListItem::new(Identity::new(v, v, v), list.clone(), v).with_duplicates(duplicates))
            .collect();

        // Expected list contents, in slot order.
        let mut model: Vec<&str> = Vec::new();

        for step in steps {
            match step {
                Step::Apply(i) => {
                    let value = VALUES[i];
                    let listed = model.contains(&value);
                    let result = items[i].harden(&ctx, true);
                    if listed && duplicates == DuplicatePolicy::Skip {
                        prop_assert!(result.is_ok());
                    } else if model.len() >= bound as usize {
                        let full = matches!(
                            result,
                            Err(HardenError::Item { source: ListError::StoreFull { .. }, .. })
                        );
                        prop_assert!(full);
                    } else {
                        prop_assert!(result.is_ok());
                        model.push(value);
                    }
                },
                Step::Restore(i) => {
                    prop_assert!(items[i].harden(&ctx, false).is_ok());
                    model.retain(|v| *v != VALUES[i]);
                },
            }

            let slots = list.entries(&ctx).unwrap();
            prop_assert!(slots.is_contiguous());
            prop_assert!(slots.len() <= bound as usize);
            prop_assert_eq!(slots.values().collect::<Vec<_>>(), model.clone());
            prop_assert_eq!(raw_slots(&hive).is_empty(), model.is_empty());
            if model.is_empty() {
                prop_assert!(raw_flag(&hive).is_none());
            }
            for (i, item) in items.iter().enumerate() {
                prop_assert_eq!(item.is_hardened(&ctx), model.contains(&VALUES[i]));
            }
        }
    }
}
