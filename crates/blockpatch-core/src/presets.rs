use crate::markers::{MERMAID_CLOSE, MERMAID_OPEN};
use crate::{Error, Result};

/// A built-in set of markers and replacement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub header: &'static str,
    pub open: &'static str,
    pub close: &'static str,
    pub replacement: &'static str,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        PRESETS
    }

    pub fn by_name(name: &str) -> Result<&'static Preset> {
        let name = name.trim();
        PRESETS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownPreset(name.to_string()))
    }
}

const PRESETS: &[Preset] = &[CLASS_DIAGRAM];

/// Workshop enrollment class diagram, written without attribute types and
/// with `direction TB` so older Mermaid releases parse it.
pub const CLASS_DIAGRAM: Preset = Preset {
    name: "class-diagram",
    description: "workshop enrollment class diagram under the \"Struktur Class Utama\" heading",
    header: "<h4>🏗️ Struktur Class Utama</h4>",
    open: MERMAID_OPEN,
    close: MERMAID_CLOSE,
    replacement: CLASS_DIAGRAM_BLOCK,
};

const CLASS_DIAGRAM_BLOCK: &str = r#"                <div class="mermaid">
classDiagram
    direction TB
    class User {
        +id
        +nimNidn
        +name
        +email
        +role
        +login()
        +logout()
    }
    class Student {
        +major
        +semester
        +maxCredits
        +joinQueue()
        +enrollWorkshop()
    }
    class Mentor {
        +department
        +maxStudents
        +createWorkshop()
        +approveUser()
    }
    class Workshop {
        +id
        +code
        +name
        +credits
        +workshopType
    }
    class Session {
        +id
        +quota
        +seatsEnabled
        +getAvailableSeats()
    }
    class Seat {
        +id
        +seatNumber
        +status
        +lock()
        +reserve()
        +confirm()
    }
    class Enrollment {
        +id
        +enrolledAt
        +status
    }

    User <|-- Student
    User <|-- Mentor
    Workshop *-- Session
    Session *-- Seat
    Student --> Enrollment
    Enrollment --> Session
    Enrollment --> Seat
                </div>
"#;
