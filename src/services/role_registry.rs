// ==================== ROLE REGISTRY ====================
// Static table mapping each role to its profile collection and identifier
// conventions. The stringly-typed lookup of earlier iterations is replaced
// by an exhaustive match on the Role enum, so adding a role without wiring
// its descriptor fails to compile.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Role;

/// Profile storage target and identifier shape for one role.
#[derive(Debug, Clone, Copy)]
pub struct RoleDescriptor {
    pub role: Role,
    pub collection: &'static str,
    pub id_field: &'static str,
    pub prefix: &'static str,
    pub width: usize,
    /// `PREFIX-####` when true, `PREFIX###` when false (Technician).
    pub separated: bool,
}

static PATIENT: RoleDescriptor = RoleDescriptor {
    role: Role::Patient,
    collection: "patients",
    id_field: "patient_id",
    prefix: "PAT",
    width: 4,
    separated: true,
};

static DOCTOR: RoleDescriptor = RoleDescriptor {
    role: Role::Doctor,
    collection: "doctors",
    id_field: "doctor_id",
    prefix: "DOC",
    width: 4,
    separated: true,
};

static PHARMACIST: RoleDescriptor = RoleDescriptor {
    role: Role::Pharmacist,
    collection: "pharmacists",
    id_field: "pharmacist_id",
    prefix: "PHAR",
    width: 4,
    separated: true,
};

static ADMINISTRATOR: RoleDescriptor = RoleDescriptor {
    role: Role::Administrator,
    collection: "administrators",
    id_field: "admin_id",
    prefix: "ADM",
    width: 4,
    separated: true,
};

static INVENTORY_MANAGER: RoleDescriptor = RoleDescriptor {
    role: Role::InventoryManager,
    collection: "inventory_managers",
    id_field: "manager_id",
    prefix: "INV",
    width: 4,
    separated: true,
};

static LAB_SUPERVISOR: RoleDescriptor = RoleDescriptor {
    role: Role::LabSupervisor,
    collection: "lab_supervisors",
    id_field: "supervisor_id",
    prefix: "LSUP",
    width: 4,
    separated: true,
};

static LAB_STAFF: RoleDescriptor = RoleDescriptor {
    role: Role::LabStaff,
    collection: "lab_staff",
    id_field: "staff_id",
    prefix: "LSTF",
    width: 4,
    separated: true,
};

static TECHNICIAN: RoleDescriptor = RoleDescriptor {
    role: Role::Technician,
    collection: "technicians",
    id_field: "technician_id",
    prefix: "T",
    width: 3,
    separated: false,
};

pub fn descriptor(role: Role) -> &'static RoleDescriptor {
    match role {
        Role::Patient => &PATIENT,
        Role::Doctor => &DOCTOR,
        Role::Pharmacist => &PHARMACIST,
        Role::Administrator => &ADMINISTRATOR,
        Role::InventoryManager => &INVENTORY_MANAGER,
        Role::LabSupervisor => &LAB_SUPERVISOR,
        Role::LabStaff => &LAB_STAFF,
        Role::Technician => &TECHNICIAN,
    }
}

lazy_static! {
    static ref PATTERNS: HashMap<Role, Regex> = {
        let mut patterns = HashMap::new();
        for role in Role::ALL {
            let desc = descriptor(role);
            let source = if desc.separated {
                format!(r"^{}-\d{{{}}}$", desc.prefix, desc.width)
            } else {
                format!(r"^{}\d{{{}}}$", desc.prefix, desc.width)
            };
            let regex = Regex::new(&source)
                .unwrap_or_else(|e| panic!("invalid identifier pattern for {}: {}", role, e));
            patterns.insert(role, regex);
        }
        patterns
    };
}

/// Compiled identifier pattern for a role, e.g. `^DOC-\d{4}$` or `^T\d{3}$`.
pub fn pattern(role: Role) -> &'static Regex {
    &PATTERNS[&role]
}

/// Formats a sequence value as the role's display identifier, zero-padded to
/// the role's fixed width.
pub fn format_identifier(desc: &RoleDescriptor, value: i64) -> String {
    if desc.separated {
        format!("{}-{:0width$}", desc.prefix, value, width = desc.width)
    } else {
        format!("{}{:0width$}", desc.prefix, value, width = desc.width)
    }
}

/// Parses the numeric suffix out of a display identifier, or `None` when the
/// value does not match the role's pattern.
pub fn parse_identifier(desc: &RoleDescriptor, identifier: &str) -> Option<i64> {
    if !pattern(desc.role).is_match(identifier) {
        return None;
    }
    let start = desc.prefix.len() + usize::from(desc.separated);
    identifier[start..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_a_descriptor() {
        for role in Role::ALL {
            let desc = descriptor(role);
            assert_eq!(desc.role, role);
            assert!(!desc.collection.is_empty());
            assert!(!desc.prefix.is_empty());
        }
    }

    #[test]
    fn test_format_identifier_is_zero_padded() {
        assert_eq!(format_identifier(descriptor(Role::Doctor), 1), "DOC-0001");
        assert_eq!(format_identifier(descriptor(Role::Doctor), 42), "DOC-0042");
        assert_eq!(format_identifier(descriptor(Role::Patient), 9999), "PAT-9999");
        assert_eq!(format_identifier(descriptor(Role::Technician), 7), "T007");
    }

    #[test]
    fn test_generated_identifiers_match_their_own_pattern() {
        for role in Role::ALL {
            let desc = descriptor(role);
            let identifier = format_identifier(desc, 3);
            assert!(
                pattern(role).is_match(&identifier),
                "{} does not match pattern for {}",
                identifier,
                role
            );
        }
    }

    #[test]
    fn test_parse_identifier_round_trips() {
        for role in Role::ALL {
            let desc = descriptor(role);
            for value in [1, 12, 123] {
                let identifier = format_identifier(desc, value);
                assert_eq!(parse_identifier(desc, &identifier), Some(value));
            }
        }
    }

    #[test]
    fn test_parse_identifier_rejects_foreign_shapes() {
        let doctor = descriptor(Role::Doctor);
        assert_eq!(parse_identifier(doctor, "PAT-0001"), None);
        assert_eq!(parse_identifier(doctor, "DOC-001"), None);   // wrong width
        assert_eq!(parse_identifier(doctor, "DOC-00012"), None); // wrong width
        assert_eq!(parse_identifier(doctor, "doc-0001"), None);
        assert_eq!(parse_identifier(doctor, ""), None);

        let technician = descriptor(Role::Technician);
        assert_eq!(parse_identifier(technician, "T-001"), None); // no separator for T
        assert_eq!(parse_identifier(technician, "T0001"), None);
        assert_eq!(parse_identifier(technician, "T001"), Some(1));
    }

    #[test]
    fn test_technician_pattern_matches_spec_shape() {
        assert!(pattern(Role::Technician).is_match("T123"));
        assert!(!pattern(Role::Technician).is_match("T1234"));
        assert!(pattern(Role::Doctor).is_match("DOC-1234"));
        assert!(pattern(Role::LabSupervisor).is_match("LSUP-0001"));
    }
}
