//! Reader for the ITC-2007 `.ctt` / `.ectt` instance format.
//!
//! ```text
//! Name: Toy
//! Courses: 4
//! Rooms: 3
//! Days: 5
//! Periods_per_day: 4
//! Curricula: 2
//! Min_Max_Daily_Lectures: 2 3
//! UnavailabilityConstraints: 8
//! RoomConstraints: 3
//!
//! COURSES:
//! SceCosC Ocra 3 3 30 1
//! ROOMS:
//! rA 32 1
//! CURRICULA:
//! Cur1 3 SceCosC ArcTec TecCos
//! UNAVAILABILITY_CONSTRAINTS:
//! TecCos 2 0
//! ROOM_CONSTRAINTS:
//! SceCosC rA
//!
//! END.
//! ```
//!
//! The classic `.ctt` dialect is accepted too: `Constraints:` instead of
//! `UnavailabilityConstraints:`, no `ROOM_CONSTRAINTS` section, course
//! lines without the double-lecture flag and room lines without a site.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use tracing::debug;

use crate::error::ParseError;
use crate::models::{Course, Room, Specification};

const SECTIONS: [&str; 5] = [
    "COURSES",
    "ROOMS",
    "CURRICULA",
    "UNAVAILABILITY_CONSTRAINTS",
    "ROOM_CONSTRAINTS",
];

/// One non-blank line split into fields, with its 1-based number.
struct Record<'a> {
    line: usize,
    fields: Vec<&'a str>,
}

impl Record<'_> {
    fn syntax(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn arity(&self, what: &str, allowed: &[usize]) -> Result<(), ParseError> {
        if allowed.contains(&self.fields.len()) {
            Ok(())
        } else {
            Err(self.syntax(format!(
                "{what} record needs {allowed:?} fields, found {}",
                self.fields.len()
            )))
        }
    }

    fn number<T: FromStr>(&self, index: usize, what: &str) -> Result<T, ParseError> {
        let raw = self.fields[index];
        raw.parse()
            .map_err(|_| self.syntax(format!("{what} must be a non-negative integer, found '{raw}'")))
    }
}

#[derive(Default)]
struct Header {
    name: String,
    courses: Option<usize>,
    rooms: Option<usize>,
    days: Option<usize>,
    periods_per_day: Option<usize>,
    curricula: Option<usize>,
    daily_lectures: Option<(usize, usize)>,
    unavailability: Option<usize>,
    room_constraints: Option<usize>,
}

/// Parses an instance.
///
/// # Errors
/// [`ParseError`] on malformed lines, missing sections or header fields,
/// header counts that disagree with the sections, unknown IDs, or
/// records rejected by specification validation.
pub fn parse_ctt(input: &str) -> Result<Specification, ParseError> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .peekable();

    let mut header = Header::default();
    while let Some(&(line, text)) = lines.peek() {
        let Some((key, value)) = text.split_once(':') else {
            return Err(ParseError::Syntax {
                line,
                message: format!("expected 'Key: value', found '{text}'"),
            });
        };
        if SECTIONS.contains(&key) {
            break;
        }
        lines.next();
        read_header_field(&mut header, line, key.trim(), value.trim())?;
    }

    let mut sections: HashMap<&str, Vec<Record<'_>>> = HashMap::new();
    let mut current: Option<&str> = None;
    for (line, text) in lines {
        if text == "END." {
            break;
        }
        if let Some(name) = text.strip_suffix(':').filter(|n| SECTIONS.contains(n)) {
            sections.entry(name).or_default();
            current = Some(name);
            continue;
        }
        let Some(name) = current else {
            return Err(ParseError::Syntax {
                line,
                message: format!("record outside any section: '{text}'"),
            });
        };
        sections.entry(name).or_default().push(Record {
            line,
            fields: text.split_whitespace().collect(),
        });
    }

    let days = header.days.ok_or(ParseError::MissingHeader("Days"))?;
    let periods = header
        .periods_per_day
        .ok_or(ParseError::MissingHeader("Periods_per_day"))?;
    let mut builder = Specification::builder(header.name.clone(), days, periods);
    if let Some((min, max)) = header.daily_lectures {
        builder = builder.daily_lectures(min, max);
    }

    let courses = take_section(&mut sections, "COURSES", true)?;
    check_count("courses", header.courses, courses.len())?;
    let mut course_ids = HashSet::new();
    for r in &courses {
        r.arity("course", &[5, 6])?;
        let double = match r.fields.get(5) {
            Some(_) => r.number::<u8>(5, "double lectures flag")? != 0,
            None => false,
        };
        course_ids.insert(r.fields[0]);
        builder = builder.course(
            Course::new(r.fields[0], r.fields[1])
                .with_lectures(r.number(2, "lectures")?)
                .with_min_working_days(r.number(3, "minimum working days")?)
                .with_students(r.number(4, "students")?)
                .with_double_lectures(double),
        );
    }

    let rooms = take_section(&mut sections, "ROOMS", true)?;
    check_count("rooms", header.rooms, rooms.len())?;
    let mut room_ids = HashSet::new();
    for r in &rooms {
        r.arity("room", &[2, 3])?;
        let site = match r.fields.get(2) {
            Some(_) => r.number(2, "site")?,
            None => 0,
        };
        room_ids.insert(r.fields[0]);
        builder = builder.room(Room::new(r.fields[0], r.number(1, "capacity")?).with_site(site));
    }

    let known_course = |r: &Record, id: &str| {
        if course_ids.contains(id) {
            Ok(())
        } else {
            Err(r.syntax(format!("unknown course '{id}'")))
        }
    };

    let curricula = take_section(&mut sections, "CURRICULA", true)?;
    check_count("curricula", header.curricula, curricula.len())?;
    for r in &curricula {
        if r.fields.len() < 2 {
            return Err(r.syntax("curriculum record needs an ID and a member count"));
        }
        let members: usize = r.number(1, "member count")?;
        if r.fields.len() - 2 != members {
            return Err(r.syntax(format!(
                "curriculum declares {members} members but lists {}",
                r.fields.len() - 2
            )));
        }
        for &id in &r.fields[2..] {
            known_course(r, id)?;
        }
        builder = builder.curriculum(r.fields[0], r.fields[2..].iter().copied());
    }

    let unavailability = take_section(&mut sections, "UNAVAILABILITY_CONSTRAINTS", true)?;
    check_count("unavailability constraints", header.unavailability, unavailability.len())?;
    for r in &unavailability {
        r.arity("unavailability", &[3])?;
        known_course(r, r.fields[0])?;
        builder = builder.unavailable(r.fields[0], r.number(1, "day")?, r.number(2, "period")?);
    }

    let required = header.room_constraints.is_some_and(|n| n > 0);
    let room_constraints = take_section(&mut sections, "ROOM_CONSTRAINTS", required)?;
    check_count("room constraints", header.room_constraints, room_constraints.len())?;
    for r in &room_constraints {
        r.arity("room constraint", &[2])?;
        known_course(r, r.fields[0])?;
        if !room_ids.contains(r.fields[1]) {
            return Err(r.syntax(format!("unknown room '{}'", r.fields[1])));
        }
        builder = builder.room_constraint(r.fields[0], r.fields[1]);
    }

    let spec = builder.build()?;
    debug!(
        instance = spec.name(),
        courses = spec.courses().len(),
        rooms = spec.rooms().len(),
        lectures = spec.total_lectures(),
        "instance parsed"
    );
    Ok(spec)
}

fn read_header_field(header: &mut Header, line: usize, key: &str, value: &str) -> Result<(), ParseError> {
    let count = || {
        value.parse::<usize>().map_err(|_| ParseError::Syntax {
            line,
            message: format!("'{key}' must be a non-negative integer, found '{value}'"),
        })
    };
    match key {
        "Name" => header.name = value.to_string(),
        "Courses" => header.courses = Some(count()?),
        "Rooms" => header.rooms = Some(count()?),
        "Days" => header.days = Some(count()?),
        "Periods_per_day" => header.periods_per_day = Some(count()?),
        "Curricula" => header.curricula = Some(count()?),
        "Constraints" | "UnavailabilityConstraints" => header.unavailability = Some(count()?),
        "RoomConstraints" => header.room_constraints = Some(count()?),
        "Min_Max_Daily_Lectures" => {
            let bounds: Vec<usize> = value
                .split_whitespace()
                .map(str::parse)
                .collect::<Result<_, _>>()
                .map_err(|_| ParseError::Syntax {
                    line,
                    message: format!("'{key}' must be two integers, found '{value}'"),
                })?;
            let [min, max] = bounds[..] else {
                return Err(ParseError::Syntax {
                    line,
                    message: format!("'{key}' must be two integers, found '{value}'"),
                });
            };
            header.daily_lectures = Some((min, max));
        }
        other => {
            return Err(ParseError::Syntax {
                line,
                message: format!("unknown header field '{other}'"),
            })
        }
    }
    Ok(())
}

fn take_section<'a>(
    sections: &mut HashMap<&'a str, Vec<Record<'a>>>,
    name: &'static str,
    required: bool,
) -> Result<Vec<Record<'a>>, ParseError> {
    match sections.remove(name) {
        Some(records) => Ok(records),
        None if required => Err(ParseError::MissingSection(name)),
        None => Ok(Vec::new()),
    }
}

fn check_count(section: &'static str, expected: Option<usize>, found: usize) -> Result<(), ParseError> {
    match expected {
        Some(expected) if expected != found => Err(ParseError::CountMismatch {
            section,
            expected,
            found,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
const TOY: &str = "\
Name: Toy
Courses: 4
Rooms: 3
Days: 5
Periods_per_day: 4
Curricula: 2
Min_Max_Daily_Lectures: 2 3
UnavailabilityConstraints: 8
RoomConstraints: 3

COURSES:
SceCosC Ocra 3 3 30 1
ArcTec Indaco 3 2 42 0
TecCos Rosa 5 4 40 1
Geotec Scarlatti 5 4 18 1

ROOMS:
rA 32 1
rB 50 0
rC 40 1

CURRICULA:
Cur1 3 SceCosC ArcTec TecCos
Cur2 2 TecCos Geotec

UNAVAILABILITY_CONSTRAINTS:
TecCos 2 0
TecCos 2 1
TecCos 3 2
TecCos 3 3
ArcTec 4 0
ArcTec 4 1
ArcTec 4 2
ArcTec 4 3

ROOM_CONSTRAINTS:
SceCosC rA
Geotec rB
TecCos rA

END.
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{toy, ARC_TEC, SCE_COS_C, TEC_COS};

    #[test]
    fn test_parse_toy_matches_fixture() {
        let parsed = parse_ctt(TOY).unwrap();
        let expected = toy();

        assert_eq!(parsed.name(), "Toy");
        assert_eq!(parsed.days(), 5);
        assert_eq!(parsed.periods_per_day(), 4);
        assert_eq!(parsed.daily_lectures(), (2, 3));
        assert_eq!(parsed.courses(), expected.courses());
        assert_eq!(parsed.rooms(), expected.rooms());
        assert_eq!(parsed.curricula(), expected.curricula());
        assert_eq!(parsed.teachers(), expected.teachers());
        assert_eq!(parsed.unavailable_slot_count(TEC_COS), 4);
        assert_eq!(parsed.unavailable_slot_count(ARC_TEC), 4);
        assert!(!parsed.is_suitable(SCE_COS_C, 0));
    }

    #[test]
    fn test_classic_dialect() {
        let input = "\
Name: Classic
Courses: 1
Rooms: 1
Days: 2
Periods_per_day: 2
Curricula: 1
Constraints: 1

COURSES:
c1 t1 2 2 20

ROOMS:
r1 30

CURRICULA:
q1 1 c1

UNAVAILABILITY_CONSTRAINTS:
c1 1 1

END.
";
        let spec = parse_ctt(input).unwrap();
        assert_eq!(spec.course(0).lectures, 2);
        assert!(!spec.course(0).double_lectures);
        assert_eq!(spec.room(0).site, 0);
        assert_eq!(spec.unavailable_slot_count(0), 1);
        assert_eq!(spec.daily_lectures(), (0, 0));
    }

    #[test]
    fn test_count_mismatch() {
        let input = TOY.replace("Rooms: 3", "Rooms: 4");
        assert_eq!(
            parse_ctt(&input).unwrap_err(),
            ParseError::CountMismatch {
                section: "rooms",
                expected: 4,
                found: 3,
            }
        );
    }

    #[test]
    fn test_bad_number_reports_line() {
        let input = TOY.replace("ArcTec Indaco 3 2 42 0", "ArcTec Indaco three 2 42 0");
        match parse_ctt(&input).unwrap_err() {
            ParseError::Syntax { line, message } => {
                assert_eq!(line, 13);
                assert!(message.contains("lectures"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_course_reports_line() {
        let input = TOY.replace("Cur2 2 TecCos Geotec", "Cur2 2 TecCos Geo");
        let err = parse_ctt(&input).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 24, .. }), "{err}");
    }

    #[test]
    fn test_unknown_room_reports_line() {
        let input = TOY.replace("Geotec rB", "Geotec rZ");
        let err = parse_ctt(&input).unwrap_err();
        assert!(err.to_string().contains("unknown room 'rZ'"));
    }

    #[test]
    fn test_wrong_member_count() {
        let input = TOY.replace("Cur1 3 SceCosC", "Cur1 4 SceCosC");
        assert!(matches!(parse_ctt(&input), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_huge_member_count_is_syntax_error() {
        let input = TOY.replace("Cur1 3 SceCosC", "Cur1 18446744073709551615 SceCosC");
        match parse_ctt(&input).unwrap_err() {
            ParseError::Syntax { line, message } => {
                assert_eq!(line, 23);
                assert!(message.contains("lists 3"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_section() {
        let cut = TOY.find("CURRICULA:").unwrap();
        let input = format!("{}END.\n", &TOY[..cut]);
        assert_eq!(parse_ctt(&input).unwrap_err(), ParseError::MissingSection("CURRICULA"));
    }

    #[test]
    fn test_missing_header() {
        let input = TOY.replace("Days: 5\n", "");
        assert_eq!(parse_ctt(&input).unwrap_err(), ParseError::MissingHeader("Days"));
    }

    #[test]
    fn test_off_grid_unavailability_is_specification_error() {
        let input = TOY.replace("TecCos 3 3", "TecCos 9 3");
        assert!(matches!(parse_ctt(&input), Err(ParseError::Specification(_))));
    }
}
