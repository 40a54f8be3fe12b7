use core::num::NonZeroU32;

use crate::entities::VoteKind;
use crate::usecases::user::ProfileMutation;

pub fn parse_nonzero_num(
    s: &str,
) -> ::core::result::Result<u32, <NonZeroU32 as ::core::str::FromStr>::Err> {
    Ok(s.parse::<::core::num::NonZeroU32>()?.get())
}

pub fn parse_vote_kind(s: &str) -> ::core::result::Result<VoteKind, String> {
    match s {
        "up" | "upvote" => Ok(VoteKind::Up),
        "down" | "downvote" => Ok(VoteKind::Down),
        s => Err(format!("expected `up` or `down`, found `{}`", s)),
    }
}

pub fn parse_profile_mutation(s: &str) -> ::core::result::Result<ProfileMutation, String> {
    // --- parsing json ---

    let mutation: ProfileMutation = serde_json::from_str(s).map_err(|e| e.to_string())?;

    // --- validating ---

    if let Some(name) = mutation.name.as_deref() {
        if name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
    }

    if let Some(username) = mutation.username.as_deref() {
        if username.trim().is_empty() {
            return Err("username must not be empty".to_string());
        }
    }

    // --- finalize ---

    Ok(mutation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_mutation_from_json() {
        let m = parse_profile_mutation(r#"{"bio": "hi", "location": "Osaka"}"#).unwrap();
        assert_eq!(m.bio.as_deref(), Some("hi"));
        assert_eq!(m.location.as_deref(), Some("Osaka"));
        assert_eq!(m.name, None);

        assert!(parse_profile_mutation(r#"{"name": " "}"#).is_err());
        assert!(parse_profile_mutation("not json").is_err());
    }

    #[test]
    fn nonzero_pages() {
        assert_eq!(parse_nonzero_num("3"), Ok(3));
        assert!(parse_nonzero_num("0").is_err());
    }
}
