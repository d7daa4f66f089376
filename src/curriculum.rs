//! Static reference data for the Kenyan Competency-Based Curriculum.
//!
//! Built once at startup with [`Curriculum::kenyan_cbc`] and shared
//! read-only (behind an `Arc`) by every request handler.

use serde::Serialize;

/// A single grade: the wire code clients send and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub code: &'static str,
    pub label: &'static str,
}

/// A senior-secondary pathway and its subjects.
#[derive(Debug, Clone, Serialize)]
pub struct Pathway {
    pub name: &'static str,
    pub subjects: Vec<&'static str>,
}

/// Subjects offered at a level: a flat list, or per-pathway lists.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Subjects {
    List(Vec<&'static str>),
    Pathways(Vec<Pathway>),
}

/// A named tier of the curriculum and the grades it spans.
#[derive(Debug, Clone, Serialize)]
pub struct CurriculumLevel {
    pub name: &'static str,
    pub grades: Vec<&'static str>,
    pub subjects: Subjects,
}

/// The full curriculum table.
#[derive(Debug, Clone, Serialize)]
pub struct Curriculum {
    pub name: &'static str,
    pub levels: Vec<CurriculumLevel>,
    #[serde(skip)]
    grades: Vec<Grade>,
}

const GRADES: &[Grade] = &[
    Grade { code: "pp1", label: "PP1" },
    Grade { code: "pp2", label: "PP2" },
    Grade { code: "grade1", label: "Grade 1" },
    Grade { code: "grade2", label: "Grade 2" },
    Grade { code: "grade3", label: "Grade 3" },
    Grade { code: "grade4", label: "Grade 4" },
    Grade { code: "grade5", label: "Grade 5" },
    Grade { code: "grade6", label: "Grade 6" },
    Grade { code: "grade7", label: "Grade 7" },
    Grade { code: "grade8", label: "Grade 8" },
    Grade { code: "grade9", label: "Grade 9" },
    Grade { code: "grade10", label: "Grade 10" },
    Grade { code: "grade11", label: "Grade 11" },
    Grade { code: "grade12", label: "Grade 12" },
];

impl Curriculum {
    pub fn kenyan_cbc() -> Self {
        let levels = vec![
            CurriculumLevel {
                name: "Pre-Primary",
                grades: vec!["pp1", "pp2"],
                subjects: Subjects::List(vec![
                    "Language Activities",
                    "Mathematical Activities",
                    "Environmental Activities",
                    "Psychomotor and Creative Activities",
                    "Religious Education Activities",
                ]),
            },
            CurriculumLevel {
                name: "Lower Primary",
                grades: vec!["grade1", "grade2", "grade3"],
                subjects: Subjects::List(vec![
                    "Literacy",
                    "Kiswahili Language Activities",
                    "English Language Activities",
                    "Mathematical Activities",
                    "Environmental Activities",
                    "Hygiene and Nutrition Activities",
                    "Religious Education Activities",
                    "Movement and Creative Activities",
                ]),
            },
            CurriculumLevel {
                name: "Upper Primary",
                grades: vec!["grade4", "grade5", "grade6"],
                subjects: Subjects::List(vec![
                    "English",
                    "Kiswahili",
                    "Mathematics",
                    "Science and Technology",
                    "Agriculture",
                    "Home Science",
                    "Social Studies",
                    "Religious Education",
                    "Creative Arts",
                    "Physical and Health Education",
                ]),
            },
            CurriculumLevel {
                name: "Junior Secondary",
                grades: vec!["grade7", "grade8", "grade9"],
                subjects: Subjects::List(vec![
                    "English",
                    "Kiswahili",
                    "Mathematics",
                    "Integrated Science",
                    "Health Education",
                    "Pre-Technical and Pre-Career Education",
                    "Social Studies",
                    "Religious Education",
                    "Business Studies",
                    "Agriculture",
                    "Life Skills Education",
                    "Sports and Physical Education",
                ]),
            },
            CurriculumLevel {
                name: "Senior Secondary",
                grades: vec!["grade10", "grade11", "grade12"],
                subjects: Subjects::Pathways(vec![
                    Pathway {
                        name: "STEM",
                        subjects: vec![
                            "Mathematics",
                            "Physics",
                            "Chemistry",
                            "Biology",
                            "Computer Science",
                            "Agriculture",
                        ],
                    },
                    Pathway {
                        name: "Social Sciences",
                        subjects: vec![
                            "History and Citizenship",
                            "Geography",
                            "Business Studies",
                            "Religious Education",
                            "Literature in English",
                            "Fasihi ya Kiswahili",
                        ],
                    },
                    Pathway {
                        name: "Arts and Sports Science",
                        subjects: vec![
                            "Music and Dance",
                            "Fine Arts",
                            "Theatre and Film",
                            "Sports and Recreation",
                        ],
                    },
                ]),
            },
        ];

        Self {
            name: crate::consts::CURRICULUM_NAME,
            levels,
            grades: GRADES.to_vec(),
        }
    }

    /// Look up a grade by its wire code.
    pub fn grade(&self, code: &str) -> Option<&Grade> {
        self.grades.iter().find(|g| g.code == code)
    }

    /// Display label for a grade code.
    pub fn grade_label(&self, code: &str) -> Option<&'static str> {
        self.grade(code).map(|g| g.label)
    }

    pub fn is_known_grade(&self, code: &str) -> bool {
        self.grade(code).is_some()
    }

    /// All grades in curriculum order.
    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }

    /// All grade codes in curriculum order.
    pub fn grade_codes(&self) -> Vec<&'static str> {
        self.grades.iter().map(|g| g.code).collect()
    }
}
