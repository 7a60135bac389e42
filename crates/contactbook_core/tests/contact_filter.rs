use contactbook_core::{
    filter_contacts, ActiveFilter, ContactRecord, ContactStore, ContactType, FilterCriteria,
    TagFilter, TypeFilter,
};

fn contact(
    id: u64,
    first_name: &str,
    last_name: &str,
    contact_type: ContactType,
    tags: Option<&str>,
) -> ContactRecord {
    let mut record = ContactRecord::new(first_name, last_name, "Staff");
    record.id = id;
    record.contact_type = contact_type;
    record.tags = tags.map(str::to_string);
    record
}

fn sample() -> Vec<ContactRecord> {
    let mut records = vec![
        contact(1, "Ana", "Levi", ContactType::Employee, Some("vip, north")),
        contact(2, "Ben", "Cohen", ContactType::Contractor, Some("north")),
        contact(3, "Dana", "Anders", ContactType::Employee, Some(" vip ")),
        contact(4, "Eli", "Mor", ContactType::Freelancer, None),
        contact(5, "Anat", "Bar", ContactType::Employee, Some("south")),
    ];
    records[0].is_active = Some(true);
    records[1].is_active = Some(false);
    records[2].is_active = Some(true);
    records[2].main_contact = true;
    records[4].main_contact = true;
    records
}

fn ids(records: &[&ContactRecord]) -> Vec<u64> {
    records.iter().map(|record| record.id).collect()
}

#[test]
fn pass_through_criteria_return_full_collection_in_order() {
    let records = sample();
    let visible = filter_contacts(&records, &FilterCriteria::default(), "");
    assert_eq!(ids(&visible), vec![1, 2, 3, 4, 5]);
}

#[test]
fn contact_type_filter_matches_exactly() {
    let records = vec![
        contact(1, "Ana", "Levi", ContactType::Employee, None),
        contact(2, "Ben", "Cohen", ContactType::Contractor, None),
    ];
    let criteria = FilterCriteria {
        contact_type: TypeFilter::Only(ContactType::Employee),
        ..FilterCriteria::default()
    };
    assert_eq!(ids(&filter_contacts(&records, &criteria, "")), vec![1]);
}

#[test]
fn tag_filter_uses_trimmed_tokens() {
    let records = sample();
    let criteria = FilterCriteria {
        tag: TagFilter::Only("vip".to_string()),
        ..FilterCriteria::default()
    };
    assert_eq!(ids(&filter_contacts(&records, &criteria, "")), vec![1, 3]);
}

#[test]
fn active_filter_compares_flag_and_skips_unknown() {
    let records = sample();
    let active = FilterCriteria {
        active_contact: ActiveFilter::Active,
        ..FilterCriteria::default()
    };
    let inactive = FilterCriteria {
        active_contact: ActiveFilter::Inactive,
        ..FilterCriteria::default()
    };
    assert_eq!(ids(&filter_contacts(&records, &active, "")), vec![1, 3]);
    assert_eq!(ids(&filter_contacts(&records, &inactive, "")), vec![2]);
}

#[test]
fn main_only_filter_keeps_flagged_records() {
    let records = sample();
    let criteria = FilterCriteria {
        main_contact_only: true,
        ..FilterCriteria::default()
    };
    assert_eq!(ids(&filter_contacts(&records, &criteria, "")), vec![3, 5]);
}

#[test]
fn search_matches_full_name_case_insensitively() {
    let records = sample();
    assert_eq!(ids(&filter_contacts(&records, &FilterCriteria::default(), "AN")), vec![1, 3, 5]);
    assert_eq!(
        ids(&filter_contacts(&records, &FilterCriteria::default(), "ana lev")),
        vec![1]
    );
    assert_eq!(
        ids(&filter_contacts(&records, &FilterCriteria::default(), "")),
        vec![1, 2, 3, 4, 5]
    );
}

#[test]
fn search_keeps_surrounding_whitespace() {
    let records = sample();
    let all = FilterCriteria::default();
    assert!(filter_contacts(&records, &all, " ana").is_empty());
    assert_eq!(ids(&filter_contacts(&records, &all, " levi")), vec![1]);
    assert!(filter_contacts(&records, &all, "   ").is_empty());
}

#[test]
fn filter_order_does_not_change_result() {
    let records = sample();
    let by_type = FilterCriteria {
        contact_type: TypeFilter::Only(ContactType::Employee),
        ..FilterCriteria::default()
    };
    let by_tag = FilterCriteria {
        tag: TagFilter::Only("vip".to_string()),
        ..FilterCriteria::default()
    };
    let search = "an";

    let type_then_tag_then_search = {
        let step1 = filter_contacts(&records, &by_type, "")
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        let step2 = filter_contacts(&step1, &by_tag, "")
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        ids(&filter_contacts(&step2, &FilterCriteria::default(), search))
    };
    let search_then_tag_then_type = {
        let step1 = filter_contacts(&records, &FilterCriteria::default(), search)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        let step2 = filter_contacts(&step1, &by_tag, "")
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        ids(&filter_contacts(&step2, &by_type, ""))
    };
    let combined = FilterCriteria {
        contact_type: TypeFilter::Only(ContactType::Employee),
        tag: TagFilter::Only("vip".to_string()),
        ..FilterCriteria::default()
    };

    assert_eq!(type_then_tag_then_search, vec![1, 3]);
    assert_eq!(search_then_tag_then_type, type_then_tag_then_search);
    assert_eq!(
        ids(&filter_contacts(&records, &combined, search)),
        type_then_tag_then_search
    );
}

#[test]
fn store_recomputes_from_full_collection_each_time() {
    let mut store = ContactStore::in_memory();
    store.load(sample()).unwrap();
    let employees = FilterCriteria {
        contact_type: TypeFilter::Only(ContactType::Employee),
        ..FilterCriteria::default()
    };

    assert_eq!(ids(&store.get_filtered(&employees, "levi")), vec![1]);
    // Changing the search term keeps the structural filter.
    assert_eq!(ids(&store.get_filtered(&employees, "")), vec![1, 3, 5]);
    // Clearing the structural filter keeps the search term.
    assert_eq!(
        ids(&store.get_filtered(&FilterCriteria::default(), "ben")),
        vec![2]
    );
}

#[test]
fn filtered_view_reflects_updates() {
    let mut store = ContactStore::in_memory();
    store.load(sample()).unwrap();
    let main_only = FilterCriteria {
        main_contact_only: true,
        ..FilterCriteria::default()
    };

    store.set_main_contact(1, true).unwrap();
    assert_eq!(ids(&store.get_filtered(&main_only, "")), vec![1, 3, 5]);
}
