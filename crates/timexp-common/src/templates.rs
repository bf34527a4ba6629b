// Grade-based starter schedules
//
// New students get a generated weekly plan and a starting XP balance that
// depend on their grade level.

use crate::clock;
use crate::types::{ActivityCategory, GradeLevel, ScheduleItem, WeeklySchedule, WEEKDAYS};

#[derive(Debug, Clone)]
pub struct GradeTemplate {
    /// Rank title shown for the level
    pub name: &'static str,
    pub xp: u64,
    pub schedule: WeeklySchedule,
}

/// Subjects used to label study sessions for a grade.
pub fn subjects_for(level: GradeLevel, grade: u8) -> [&'static str; 6] {
    match level {
        GradeLevel::Elementary if grade <= 2 => {
            ["Story Time", "Phonics", "Basic Counting", "Drawing", "Recess", "Nature Study"]
        }
        GradeLevel::Elementary => [
            "Reading Mastery",
            "Creative Writing",
            "Multiplication",
            "World Cultures",
            "Art Studio",
            "Science Lab",
        ],
        GradeLevel::Middle => [
            "Algebra Foundations",
            "Earth & Space Science",
            "Civics",
            "English Literature",
            "Robotics Club",
            "Physical Education",
        ],
        GradeLevel::High if grade >= 11 => [
            "AP Calculus",
            "Physics Honors",
            "Advanced Psychology",
            "World Literature",
            "SAT/ACT Prep",
            "Organic Chemistry",
        ],
        GradeLevel::High => [
            "Geometry",
            "Biology",
            "US History",
            "Foreign Language (Spanish)",
            "Debate Team",
            "Track & Field",
        ],
        GradeLevel::University => [
            "Advanced Algorithms",
            "Quantum Mechanics",
            "Social Psychology Research",
            "Thesis Workshop",
            "Machine Learning",
            "Ethics in Tech",
        ],
    }
}

pub fn schedule_for_grade(level: GradeLevel, grade: u8) -> WeeklySchedule {
    let subjects = subjects_for(level, grade);
    let mut schedule = WeeklySchedule::new();

    for day in WEEKDAYS {
        let mut items = Vec::new();

        if !clock::is_weekend(day) {
            items.push(
                ScheduleItem::new(
                    ActivityCategory::Studying,
                    "08:30",
                    "11:30",
                    format!("{} Session", subjects[0]),
                )
                .with_subject(subjects[0]),
            );
            items.push(
                ScheduleItem::new(
                    ActivityCategory::Studying,
                    "12:30",
                    "15:00",
                    format!("{} Lab", subjects[1]),
                )
                .with_subject(subjects[1]),
            );

            if matches!(day, "Tuesday" | "Thursday") {
                let label =
                    if level == GradeLevel::Elementary { "Park Play" } else { "Team Practice" };
                items.push(ScheduleItem::new(ActivityCategory::Exercise, "16:00", "17:30", label));
            } else {
                items.push(ScheduleItem::new(
                    ActivityCategory::Reading,
                    "16:30",
                    "17:30",
                    "Knowledge Expansion (Reading)",
                ));
            }

            items.push(
                ScheduleItem::new(
                    ActivityCategory::Studying,
                    "19:00",
                    "20:30",
                    "Daily Mission Review",
                )
                .with_subject(subjects[2]),
            );
        } else {
            items.push(ScheduleItem::new(
                ActivityCategory::Rest,
                "10:00",
                "12:00",
                "System Maintenance (Deep Sleep)",
            ));
            items.push(ScheduleItem::new(
                ActivityCategory::Playtime,
                "14:00",
                "18:00",
                "Social Simulation (Hangout)",
            ));
            if day == "Sunday" {
                items.push(ScheduleItem::new(
                    ActivityCategory::Chores,
                    "19:00",
                    "20:00",
                    "Quarterly Base Cleanup",
                ));
            }
        }

        schedule.set_day(day, items);
    }

    schedule
}

pub fn grade_template(level: GradeLevel, grade: u8) -> GradeTemplate {
    let (name, xp) = match level {
        GradeLevel::Elementary => ("Junior Scout", 500),
        GradeLevel::Middle => ("Mission Specialist", 1500),
        GradeLevel::High => ("Senior Commander", 4000),
        GradeLevel::University => ("Elite Strategist", 8000),
    };

    GradeTemplate { name, xp, schedule: schedule_for_grade(level, grade) }
}
