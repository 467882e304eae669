//! Named-operation entry point.
//!
//! Hosts address PLV with an operation name and a list of positional string
//! arguments. The [`Dispatcher`] validates the argument count before any
//! ledger access, runs the operation on [`Plv`], and returns the response
//! payload as bytes: empty for mutations, a JSON document for queries.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info_span};

use plv_repo::EntityCodec;

use crate::bootstrap::BootstrapMode;
use crate::error::{PlvError, PlvResult};
use crate::service::Plv;

/// Every operation a host can invoke by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `init [mode]`
    Init,
    /// `addUser <username> <user-json>`
    AddUser,
    /// `DemandImage <image-json>`
    DemandImage,
    /// `DeliverImage <id> <name> <md5-hash> <purchase-date>`
    DeliverImage,
    /// `AuthenticateAsUser <username> <password>`
    AuthenticateAsUser,
    /// `getUsers`
    GetUsers,
    /// `GetImagesByUser <username>`
    GetImagesByUser,
    /// `getImage <id>`
    GetImage,
    /// `GetImages`
    GetImages,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Init,
        Operation::AddUser,
        Operation::DemandImage,
        Operation::DeliverImage,
        Operation::AuthenticateAsUser,
        Operation::GetUsers,
        Operation::GetImagesByUser,
        Operation::GetImage,
        Operation::GetImages,
    ];

    /// Wire name of the operation. Case matters.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::AddUser => "addUser",
            Self::DemandImage => "DemandImage",
            Self::DeliverImage => "DeliverImage",
            Self::AuthenticateAsUser => "AuthenticateAsUser",
            Self::GetUsers => "getUsers",
            Self::GetImagesByUser => "GetImagesByUser",
            Self::GetImage => "getImage",
            Self::GetImages => "GetImages",
        }
    }

    /// Whether the operation writes to the ledger.
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::Init | Self::AddUser | Self::DemandImage | Self::DeliverImage
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = PlvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| PlvError::Argument(format!("unknown operation {s:?}")))
    }
}

/// Routes named operations to a shared [`Plv`].
#[derive(Clone, Debug)]
pub struct Dispatcher {
    plv: Arc<Plv>,
}

impl Dispatcher {
    pub fn new(plv: Arc<Plv>) -> Self {
        Self { plv }
    }

    pub fn plv(&self) -> &Plv {
        &self.plv
    }

    /// Run any operation by name.
    pub fn invoke(&self, name: &str, args: &[String]) -> PlvResult<Vec<u8>> {
        let op: Operation = name.parse()?;
        self.dispatch(op, args)
    }

    /// Run a read-only operation by name. Mutations are rejected before any
    /// ledger access.
    pub fn query(&self, name: &str, args: &[String]) -> PlvResult<Vec<u8>> {
        let op: Operation = name.parse()?;
        if op.is_mutation() {
            return Err(PlvError::Argument(format!(
                "{op} modifies the ledger and cannot be run as a query"
            )));
        }
        self.dispatch(op, args)
    }

    pub fn dispatch(&self, op: Operation, args: &[String]) -> PlvResult<Vec<u8>> {
        let span = info_span!("dispatch", op = %op, args = args.len());
        let _enter = span.enter();

        let plv = &self.plv;
        match op {
            Operation::Init => {
                let mode = match args {
                    [] => BootstrapMode::default(),
                    [mode] => mode.parse()?,
                    _ => return Err(arity(op, "at most 1", args)),
                };
                plv.bootstrap(mode)?;
                Ok(Vec::new())
            }
            Operation::AddUser => {
                let [username, payload] = exact::<2>(op, args)?;
                plv.register_user(username, payload)?;
                Ok(Vec::new())
            }
            Operation::DemandImage => {
                let [payload] = exact::<1>(op, args)?;
                plv.demand_image(payload)?;
                Ok(Vec::new())
            }
            Operation::DeliverImage => {
                let [id, name, md5_hash, purchase_date] = exact::<4>(op, args)?;
                plv.deliver_image(id, name, md5_hash, purchase_date)?;
                Ok(Vec::new())
            }
            Operation::AuthenticateAsUser => {
                let [username, password] = exact::<2>(op, args)?;
                let result = plv.authenticate_as_user(username, password);
                debug!(username = %username, authenticated = result.authenticated, "authentication");
                Ok(EntityCodec::encode_auth(&result)?)
            }
            Operation::GetUsers => {
                exact::<0>(op, args)?;
                Ok(EntityCodec::encode_users(plv.users()?)?)
            }
            Operation::GetImagesByUser => {
                let [username] = exact::<1>(op, args)?;
                Ok(EntityCodec::encode_images(plv.images_by_user(username)?)?)
            }
            Operation::GetImage => {
                let [id] = exact::<1>(op, args)?;
                plv.image_bytes(id)
            }
            Operation::GetImages => {
                exact::<0>(op, args)?;
                Ok(EntityCodec::encode_images(plv.images()?)?)
            }
        }
    }
}

fn exact<'a, const N: usize>(op: Operation, args: &'a [String]) -> PlvResult<[&'a str; N]> {
    if args.len() != N {
        return Err(arity(op, &N.to_string(), args));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

fn arity(op: Operation, expected: &str, args: &[String]) -> PlvError {
    PlvError::Argument(format!(
        "{op} expects {expected} argument(s), got {}",
        args.len()
    ))
}
