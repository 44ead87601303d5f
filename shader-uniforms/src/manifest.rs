use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde_derive::{Deserialize, Serialize};

use crate::{
    context::GraphicsContext,
    program::{ShaderProgram, ShaderProgramBuilder},
    Policy,
};

/// A `shaders.toml` file naming shader source pairs.
///
/// ```toml
/// policy = "legacy"
///
/// [shaders.basic]
/// vertex = "basic.vert"
/// fragment = "basic.frag"
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub policy: Policy,
    #[serde(default)]
    pub shaders: BTreeMap<String, ShaderInfo>,
    /// Directory source paths are relative to.
    #[serde(skip)]
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderInfo {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
    #[serde(default)]
    pub policy: Option<Policy>,
    #[serde(default)]
    pub first_texture_unit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = read(path)?;
        let mut manifest: Manifest = text.parse()?;
        manifest.root = path.parent().map(Path::to_owned).unwrap_or_default();
        Ok(manifest)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shaders.keys().map(String::as_str)
    }

    pub fn info(&self, name: &str) -> Result<&ShaderInfo, ManifestError> {
        self.shaders
            .get(name)
            .ok_or_else(|| ManifestError::UnknownShader(name.to_owned()))
    }

    /// The policy for `name`, falling back to the manifest wide one.
    pub fn policy_of(&self, name: &str) -> Result<Policy, ManifestError> {
        Ok(self.info(name)?.policy.unwrap_or(self.policy))
    }

    pub fn sources(&self, name: &str) -> Result<ShaderSources, ManifestError> {
        let info = self.info(name)?;
        Ok(ShaderSources {
            vertex: read(&self.root.join(&info.vertex))?,
            fragment: read(&self.root.join(&info.fragment))?,
        })
    }

    pub fn program<C: GraphicsContext>(&self, name: &str) -> Result<ShaderProgram<C>, ManifestError> {
        let info = self.info(name)?;
        let ShaderSources { vertex, fragment } = self.sources(name)?;
        log::debug!("loaded shader `{}` from {:?}", name, self.root);
        Ok(ShaderProgramBuilder::new()
            .vertex(vertex)
            .fragment(fragment)
            .policy(info.policy.unwrap_or(self.policy))
            .first_texture_unit(info.first_texture_unit)
            .build())
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

fn read(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_owned(),
        source,
    })
}

#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    #[error("couldn't read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid shader manifest")]
    Parse(#[from] toml::de::Error),
    #[error("no shader named `{0}` in the manifest")]
    UnknownShader(String),
}
