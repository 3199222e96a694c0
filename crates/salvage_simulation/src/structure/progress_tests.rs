//! Tests for Structure Progression FSM.

#[cfg(test)]
mod tests {
    use crate::components::ResourcePool;
    use crate::structure::{RepairSite, Structure, StructureState};
    use bevy::prelude::*;

    #[test]
    fn test_repaired_after_exactly_needed_ticks() {
        let mut structure = Structure::new(0, 50, 1, 2);
        let mut pool = ResourcePool::new(100);

        for tick in 1..=49 {
            structure.contribute(Some(&mut pool));
            assert_eq!(structure.state(), StructureState::Damaged, "tick {tick}");
        }

        structure.contribute(Some(&mut pool));
        assert_eq!(structure.state(), StructureState::Repaired);
        assert_eq!(structure.resource_collected(), 50);
        assert_eq!(pool.available(), 50);
    }

    #[test]
    fn test_collected_never_exceeds_needed() {
        let mut structure = Structure::new(0, 7, 5, 2);
        let mut pool = ResourcePool::new(100);

        structure.contribute(Some(&mut pool));
        assert_eq!(structure.resource_collected(), 5);
        structure.contribute(Some(&mut pool));
        assert_eq!(structure.resource_collected(), 7);
        assert_eq!(structure.state(), StructureState::Repaired);
        // Снято только то, что реально вошло
        assert_eq!(pool.available(), 93);

        // После Repaired пул больше не трогаем
        assert_eq!(structure.contribute(Some(&mut pool)), 0);
        assert_eq!(pool.available(), 93);
    }

    #[test]
    fn test_pool_below_minimum_blocks_transfer() {
        let mut structure = Structure::new(0, 10, 1, 2);
        let mut pool = ResourcePool::new(1);

        assert_eq!(structure.contribute(Some(&mut pool)), 0);
        assert_eq!(structure.resource_collected(), 0);
        assert_eq!(pool.available(), 1);

        assert_eq!(structure.contribute(None), 0);
        assert_eq!(structure.state(), StructureState::Damaged);
    }

    #[test]
    fn test_zero_needed_repairs_on_first_poll() {
        let mut structure = Structure::new(0, 0, 1, 2);
        assert_eq!(structure.progress_ratio(), 1.0);

        structure.contribute(None);
        assert_eq!(structure.state(), StructureState::Repaired);
        assert_eq!(structure.progress_ratio(), 1.0);
    }

    #[test]
    fn test_negative_needed_normalised_to_zero() {
        let mut structure = Structure::new(2, -5, 1, 2);
        assert_eq!(structure.resource_needed(), 0);
        assert_eq!(structure.variant_index(), 2);

        structure.contribute(None);
        assert_eq!(structure.state(), StructureState::Repaired);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut structure = Structure::new(0, 0, 1, 2);
        assert!(!structure.finalize(), "Damaged cannot finalize");

        structure.contribute(None);
        assert!(structure.finalize());
        assert_eq!(structure.state(), StructureState::Finalized);
        assert!(!structure.finalize());
        assert_eq!(structure.state(), StructureState::Finalized);
    }

    #[test]
    fn test_state_only_advances() {
        let mut structure = Structure::new(0, 3, 1, 2);
        let mut pool = ResourcePool::new(10);
        let mut last = structure.state();

        for _ in 0..10 {
            structure.contribute(Some(&mut pool));
            structure.finalize();
            assert!(structure.state() >= last);
            last = structure.state();
        }
        assert_eq!(last, StructureState::Finalized);
    }

    #[test]
    fn test_progress_ratio() {
        let mut structure = Structure::new(0, 4, 1, 2);
        let mut pool = ResourcePool::new(10);
        structure.contribute(Some(&mut pool));
        assert_eq!(structure.progress_ratio(), 0.25);
    }

    #[test]
    fn test_repair_site_box_volume() {
        let site = RepairSite::new(Vec3::new(4.0, 2.0, 4.0));
        let center = Vec3::new(10.0, 0.0, 10.0);

        assert!(site.contains(center, Vec3::new(13.0, 1.0, 6.5)));
        assert!(site.contains(center, Vec3::new(14.0, 0.0, 14.0)));
        assert!(!site.contains(center, Vec3::new(14.5, 0.0, 10.0)));
        assert!(!site.contains(center, Vec3::new(10.0, 3.0, 10.0)));
    }
}
