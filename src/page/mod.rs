pub mod catalog;
pub mod scheduler;
pub mod store;

pub use catalog::*;
pub use scheduler::*;
pub use store::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        let pictures: Vec<String> = (0..16).map(|i| format!("shot-{:02}", i)).collect();
        Catalog::build(&pictures, COVER_TEXTURE, BACK_COVER_TEXTURE)
    }

    #[test]
    fn test_catalog_bounds_the_store() {
        let catalog = sample_catalog();
        let mut store = PageStore::new(catalog.len());

        // The "back cover" control targets one past the last sheet.
        assert!(store.set_target(catalog.len()).is_ok());
        assert!(store.set_target(catalog.len() + 1).is_err());
    }

    #[test]
    fn test_reader_walks_to_back_cover() {
        let catalog = sample_catalog();
        let mut store = PageStore::new(catalog.len());
        let mut scheduler = TurnScheduler::new(store.target());

        store.set_target(catalog.len()).unwrap();
        scheduler.retarget(0.0, &store);

        let mut now = 0.0;
        while !scheduler.is_idle() {
            now += 10.0;
            scheduler.advance(now, &store);
            assert!(now < 10_000.0, "scheduler failed to converge");
        }
        assert_eq!(scheduler.displayed(), catalog.len());
    }

    #[test]
    fn test_clicking_a_sheet_turns_it_both_ways() {
        let catalog = sample_catalog();
        let mut store = PageStore::new(catalog.len());
        let mut scheduler = TurnScheduler::new(store.target());

        // Clicking sheet 0 while it lies to the right turns it; clicking
        // it again sends it back. The click handler maps a sheet to the
        // page after it when untouched, or to the sheet itself once
        // turned.
        let sheet = 0;
        let opened = scheduler.displayed() > sheet;
        assert!(!opened);
        store.set_target(sheet + 1).unwrap();
        scheduler.retarget(0.0, &store);
        assert_eq!(scheduler.displayed(), 1);
        assert!(scheduler.is_idle());

        let opened = scheduler.displayed() > sheet;
        assert!(opened);
        store.set_target(sheet).unwrap();
        scheduler.retarget(10.0, &store);
        assert_eq!(scheduler.displayed(), 0);
        assert!(scheduler.is_idle());
    }
}
