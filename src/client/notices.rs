use crate::models::chat::{ Message, Sender };

pub const WELCOME_ID: &str = "init-welcome";
pub const WELCOME: &str =
    "Bonjour! Je suis PolyÉDI. Posez-moi une question sur l’ÉDI et les équipes de projet.";
pub const SEND_FAILED: &str =
    "Désolé, une erreur est survenue lors de la connexion à l'API. (Vérifiez la console pour les détails)";
pub const MISSING_CLIENT_ID: &str =
    "ERREUR: le Client ID Botpress est manquant. Ajoutez `VITE_BOTPRESS_CLIENT_ID` dans votre .env.";
pub const CANNOT_SEND: &str =
    "ERREUR: Impossible d'envoyer le message. Vérifiez la configuration Botpress.";
pub const RESET_FAILED: &str =
    "Désolé, impossible de démarrer une nouvelle conversation. Réessayez sous peu.";

pub fn welcome() -> Message {
    Message {
        id: WELCOME_ID.to_string(),
        sender: Sender::Ai,
        text: WELCOME.to_string(),
    }
}

/// Inline notices shown above the history. Never persisted.
pub fn status_notices(client_configured: bool) -> Vec<Message> {
    let mut notices = Vec::new();
    if !client_configured {
        notices.push(Message {
            id: "missing-client-id".to_string(),
            sender: Sender::Ai,
            text: MISSING_CLIENT_ID.to_string(),
        });
    }
    notices
}
