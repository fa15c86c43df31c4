/// One step of the booking wizard, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Clinic,
    Doctor,
    Slot,
    PatientInfo,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Clinic, Stage::Doctor, Stage::Slot, Stage::PatientInfo];

    /// 1-based position shown in the wizard header.
    pub fn number(self) -> u8 {
        match self {
            Stage::Clinic => 1,
            Stage::Doctor => 2,
            Stage::Slot => 3,
            Stage::PatientInfo => 4,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Clinic => "clinic",
            Stage::Doctor => "service and doctor",
            Stage::Slot => "date and time",
            Stage::PatientInfo => "patient details",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_numbered_in_wizard_order() {
        let numbers: Vec<u8> = Stage::ALL.iter().map(|s| s.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert!(Stage::ALL.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn stage_names_read_as_wizard_steps() {
        assert_eq!(Stage::Doctor.to_string(), "service and doctor");
        assert_eq!(Stage::PatientInfo.to_string(), "patient details");
    }

    #[test]
    fn incomplete_error_names_step_number() {
        let err = crate::BookingError::Incomplete { stage: Stage::Slot };
        assert_eq!(err.to_string(), "step 3 (date and time) is incomplete");
    }
}
