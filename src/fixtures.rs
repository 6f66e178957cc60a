//! Shared test instances.

use std::sync::Arc;

use crate::models::{Course, Room, Specification};

/// The ITC-2007 "Toy" instance: 4 courses, 3 rooms, 2 curricula,
/// 5 days x 4 periods.
pub(crate) fn toy() -> Arc<Specification> {
    Specification::builder("Toy", 5, 4)
        .daily_lectures(2, 3)
        .course(
            Course::new("SceCosC", "Ocra")
                .with_lectures(3)
                .with_min_working_days(3)
                .with_students(30)
                .with_double_lectures(true),
        )
        .course(
            Course::new("ArcTec", "Indaco")
                .with_lectures(3)
                .with_min_working_days(2)
                .with_students(42),
        )
        .course(
            Course::new("TecCos", "Rosa")
                .with_lectures(5)
                .with_min_working_days(4)
                .with_students(40)
                .with_double_lectures(true),
        )
        .course(
            Course::new("Geotec", "Scarlatti")
                .with_lectures(5)
                .with_min_working_days(4)
                .with_students(18)
                .with_double_lectures(true),
        )
        .room(Room::new("rA", 32).with_site(1))
        .room(Room::new("rB", 50))
        .room(Room::new("rC", 40).with_site(1))
        .curriculum("Cur1", ["SceCosC", "ArcTec", "TecCos"])
        .curriculum("Cur2", ["TecCos", "Geotec"])
        .unavailable("TecCos", 2, 0)
        .unavailable("TecCos", 2, 1)
        .unavailable("TecCos", 3, 2)
        .unavailable("TecCos", 3, 3)
        .unavailable("ArcTec", 4, 0)
        .unavailable("ArcTec", 4, 1)
        .unavailable("ArcTec", 4, 2)
        .unavailable("ArcTec", 4, 3)
        .room_constraint("SceCosC", "rA")
        .room_constraint("Geotec", "rB")
        .room_constraint("TecCos", "rA")
        .build_shared()
        .expect("toy instance is valid")
}

/// Toy course indices.
pub(crate) const SCE_COS_C: usize = 0;
pub(crate) const ARC_TEC: usize = 1;
pub(crate) const TEC_COS: usize = 2;
pub(crate) const GEOTEC: usize = 3;

/// A denser instance: 6 courses over 2 curricula sharing two teachers,
/// 3 days x 3 periods, 3 rooms.
pub(crate) fn crowded() -> Arc<Specification> {
    Specification::builder("Crowded", 3, 3)
        .course(Course::new("M1", "Alice").with_lectures(3).with_students(50))
        .course(Course::new("M2", "Bob").with_lectures(2).with_students(35))
        .course(Course::new("M3", "Carol").with_lectures(2).with_students(20))
        .course(Course::new("P1", "Alice").with_lectures(2).with_students(45))
        .course(Course::new("P2", "Dave").with_lectures(3).with_students(25))
        .course(Course::new("P3", "Erin").with_lectures(2).with_students(60))
        .room(Room::new("Big", 60))
        .room(Room::new("Mid", 40))
        .room(Room::new("Small", 25))
        .curriculum("Math", ["M1", "M2", "M3"])
        .curriculum("Phys", ["P1", "P2", "P3"])
        .unavailable("M2", 0, 0)
        .unavailable("P3", 2, 2)
        .room_constraint("P2", "Big")
        .build_shared()
        .expect("crowded instance is valid")
}
