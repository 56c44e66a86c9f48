use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boat {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub fleet: String,
}

#[derive(Debug, Serialize)]
pub struct BoatResponse {
    pub id: String,
    pub name: String,
    pub fleet: String,
}

#[derive(Debug, Deserialize)]
pub struct NewBoat {
    pub name: String,
    pub fleet: String,
}

impl NewBoat {
    pub fn into_boat(self) -> Result<Boat, &'static str> {
        let name = self.name.trim();
        let fleet = self.fleet.trim();
        if name.is_empty() {
            return Err("name is required");
        }
        if fleet.is_empty() {
            return Err("fleet is required");
        }
        Ok(Boat {
            id: ObjectId::new(),
            name: name.to_string(),
            fleet: fleet.to_string(),
        })
    }
}

impl From<Boat> for BoatResponse {
    fn from(boat: Boat) -> Self {
        BoatResponse {
            id: boat.id.to_hex(),
            name: boat.name,
            fleet: boat.fleet,
        }
    }
}
