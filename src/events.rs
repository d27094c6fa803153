use crate::error::{CdlError, Result};

/// The 2023 CDL qualifying calendar: (major, number of qualifying weeks).
///
/// Major 1 ran a shortened two-week qualifier; majors 2 through 5 each ran
/// three weeks.
const VALID_EVENTS: &[(u8, u8)] = &[(1, 2), (2, 3), (3, 3), (4, 3), (5, 3)];

/// Validate a major/week pair against the event calendar.
///
/// Fails fast with [`CdlError::MajorDoesNotExist`] before any network work
/// so callers never fetch pages for events that cannot exist.
pub fn check_event_exists(major: u8, week: u8) -> Result<()> {
    let weeks = VALID_EVENTS
        .iter()
        .find(|(m, _)| *m == major)
        .map(|(_, w)| *w)
        .ok_or(CdlError::MajorDoesNotExist { major, week })?;
    if week == 0 || week > weeks {
        return Err(CdlError::MajorDoesNotExist { major, week });
    }
    Ok(())
}

/// Build the fandom scoreboard URL for a qualifying week.
///
/// Week 1 lives at the bare `/Scoreboards` page; later weeks get a
/// `/Week_N` suffix.
pub(crate) fn scoreboard_url(major: u8, week: u8) -> String {
    let base = format!(
        "https://cod-esports.fandom.com/wiki/Call_of_Duty_League/2023_Season/Major_{major}/Qualifiers/Scoreboards"
    );
    if week == 1 {
        base
    } else {
        format!("{base}/Week_{week}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_calendar_entry() {
        for &(major, weeks) in VALID_EVENTS {
            for week in 1..=weeks {
                assert!(check_event_exists(major, week).is_ok());
            }
        }
    }

    #[test]
    fn rejects_unknown_major() {
        assert!(matches!(
            check_event_exists(6, 1),
            Err(CdlError::MajorDoesNotExist { major: 6, week: 1 })
        ));
        assert!(check_event_exists(0, 1).is_err());
    }

    #[test]
    fn rejects_out_of_range_week() {
        assert!(check_event_exists(1, 3).is_err());
        assert!(check_event_exists(2, 4).is_err());
        assert!(check_event_exists(3, 0).is_err());
    }

    #[test]
    fn week_one_has_no_suffix() {
        assert!(!scoreboard_url(2, 1).contains("Week_"));
        assert!(scoreboard_url(2, 3).ends_with("/Week_3"));
    }
}
