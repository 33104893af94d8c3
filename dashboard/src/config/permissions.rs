//! Unix permission bits for decoy files such as `/etc/passwd`

use std::fmt;
use std::str::FromStr;

/// Read/write/execute toggles for one role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permission {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl Permission {
    pub fn new(read: bool, write: bool, execute: bool) -> Self {
        Self { read, write, execute }
    }

    /// Octal digit using weights r=4, w=2, x=1
    pub fn to_digit(&self) -> u8 {
        (self.read as u8) * 4 + (self.write as u8) * 2 + (self.execute as u8)
    }

    /// Inverse of [`Permission::to_digit`]; only the low three bits are read
    pub fn from_digit(digit: u8) -> Self {
        Self {
            read: digit & 4 != 0,
            write: digit & 2 != 0,
            execute: digit & 1 != 0,
        }
    }

    pub fn set(&mut self, bit: PermissionBit, on: bool) {
        match bit {
            PermissionBit::Read => self.read = on,
            PermissionBit::Write => self.write = on,
            PermissionBit::Execute => self.execute = on,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionBit {
    Read,
    Write,
    Execute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Group,
    Other,
}

/// Permission triple for owner, group and other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileMode {
    pub owner: Permission,
    pub group: Permission,
    pub other: Permission,
}

impl FileMode {
    pub fn new(owner: Permission, group: Permission, other: Permission) -> Self {
        Self { owner, group, other }
    }

    /// Three-digit octal string, e.g. `"640"`
    pub fn to_octal(&self) -> String {
        format!(
            "{}{}{}",
            self.owner.to_digit(),
            self.group.to_digit(),
            self.other.to_digit()
        )
    }

    /// Parse a three-digit octal string back into rwx triples
    pub fn parse_octal(s: &str) -> Result<Self, String> {
        let digits: Vec<u8> = s
            .trim()
            .chars()
            .map(|c| match c {
                '0'..='7' => Ok(c as u8 - b'0'),
                _ => Err(format!("Invalid octal digit '{}' in mode {}", c, s)),
            })
            .collect::<Result<_, _>>()?;

        match digits.as_slice() {
            [owner, group, other] => Ok(Self {
                owner: Permission::from_digit(*owner),
                group: Permission::from_digit(*group),
                other: Permission::from_digit(*other),
            }),
            _ => Err(format!("Mode must have exactly three octal digits: {}", s)),
        }
    }

    pub fn role_mut(&mut self, role: Role) -> &mut Permission {
        match role {
            Role::Owner => &mut self.owner,
            Role::Group => &mut self.group,
            Role::Other => &mut self.other,
        }
    }

    pub fn set(&mut self, role: Role, bit: PermissionBit, on: bool) {
        self.role_mut(role).set(bit, on);
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_octal())
    }
}

impl FromStr for FileMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileMode::parse_octal(s)
    }
}
