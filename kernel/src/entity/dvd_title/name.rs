use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct TitleName(String);

impl TitleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
