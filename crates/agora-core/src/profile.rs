use crate::error::{CoreError, CoreResult};
use crate::sequence::{self, Sequences};
use agora_db::models::{ProjectRow, SkillRow, UserRow};
use agora_db::Database;
use agora_types::api::{ProjectPayload, UserPage};
use agora_types::models::{Project, Skill, User};
use anyhow::anyhow;
use std::sync::Arc;
use uuid::Uuid;

/// Per-user portfolio records (projects and skills) plus the public
/// user pages composed from them. Project and skill IDs are scoped by
/// owner, so every user's records count up from 1.
#[derive(Clone)]
pub struct Profiles {
    db: Arc<Database>,
    sequences: Sequences,
}

impl Profiles {
    pub fn new(db: Arc<Database>, sequences: Sequences) -> Self {
        Self { db, sequences }
    }

    // -- Projects --

    pub fn add_project(&self, user_id: Uuid, payload: &ProjectPayload) -> CoreResult<Project> {
        let scope = user_id.to_string();
        let project_id = self.sequences.allocate(sequence::PROJECTS, &scope)?;

        self.db.insert_project(&ProjectRow {
            user_id: scope,
            project_id,
            title: payload.title.clone(),
            start_date: payload.start_date.clone(),
            end_date: payload.end_date.clone(),
            details: payload.details.clone(),
        })?;

        Ok(Project {
            user_id,
            project_id,
            title: payload.title.clone(),
            start_date: payload.start_date.clone(),
            end_date: payload.end_date.clone(),
            details: payload.details.clone(),
        })
    }

    pub fn projects(&self, user_id: Uuid) -> CoreResult<Vec<Project>> {
        let rows = self.db.projects_for_user(&user_id.to_string())?;
        Ok(rows
            .into_iter()
            .map(|row| Project {
                user_id,
                project_id: row.project_id,
                title: row.title,
                start_date: row.start_date,
                end_date: row.end_date,
                details: row.details,
            })
            .collect())
    }

    /// Records are addressed by (owner, id), so one user's project IDs
    /// never resolve against another's records.
    pub fn update_project(
        &self,
        user_id: Uuid,
        project_id: i64,
        payload: &ProjectPayload,
    ) -> CoreResult<Project> {
        let scope = user_id.to_string();
        if self.db.get_project(&scope, project_id)?.is_none() {
            return Err(CoreError::NotFound("project"));
        }

        self.db.update_project(
            &scope,
            project_id,
            &payload.title,
            &payload.start_date,
            &payload.end_date,
            &payload.details,
        )?;

        Ok(Project {
            user_id,
            project_id,
            title: payload.title.clone(),
            start_date: payload.start_date.clone(),
            end_date: payload.end_date.clone(),
            details: payload.details.clone(),
        })
    }

    pub fn delete_project(&self, user_id: Uuid, project_id: i64) -> CoreResult<()> {
        if self.db.delete_project(&user_id.to_string(), project_id)? == 0 {
            return Err(CoreError::NotFound("project"));
        }
        Ok(())
    }

    // -- Skills --

    pub fn add_skill(&self, user_id: Uuid, stack: &str) -> CoreResult<Skill> {
        let scope = user_id.to_string();
        let skill_id = self.sequences.allocate(sequence::SKILLS, &scope)?;

        self.db.insert_skill(&SkillRow {
            user_id: scope,
            skill_id,
            stack: stack.to_string(),
        })?;

        Ok(Skill {
            user_id,
            skill_id,
            stack: stack.to_string(),
        })
    }

    pub fn skills(&self, user_id: Uuid) -> CoreResult<Vec<Skill>> {
        let rows = self.db.skills_for_user(&user_id.to_string())?;
        Ok(rows
            .into_iter()
            .map(|row| Skill {
                user_id,
                skill_id: row.skill_id,
                stack: row.stack,
            })
            .collect())
    }

    pub fn update_skill(&self, user_id: Uuid, skill_id: i64, stack: &str) -> CoreResult<Skill> {
        let scope = user_id.to_string();
        if self.db.get_skill(&scope, skill_id)?.is_none() {
            return Err(CoreError::NotFound("skill"));
        }

        self.db.update_skill(&scope, skill_id, stack)?;

        Ok(Skill {
            user_id,
            skill_id,
            stack: stack.to_string(),
        })
    }

    pub fn delete_skill(&self, user_id: Uuid, skill_id: i64) -> CoreResult<()> {
        if self.db.delete_skill(&user_id.to_string(), skill_id)? == 0 {
            return Err(CoreError::NotFound("skill"));
        }
        Ok(())
    }

    // -- Users --

    pub fn user_by_id(&self, user_id: Uuid) -> CoreResult<User> {
        let Some(row) = self.db.get_user_by_id(&user_id.to_string())? else {
            return Err(CoreError::NotFound("user"));
        };
        user_view(row)
    }

    /// A user's public page: profile plus portfolio, looked up by the
    /// display nickname.
    pub fn user_page(&self, nickname: &str) -> CoreResult<UserPage> {
        let Some(row) = self.db.get_user_by_nickname(nickname)? else {
            return Err(CoreError::NotFound("user"));
        };
        let user = user_view(row)?;
        let projects = self.projects(user.user_id)?;
        let skills = self.skills(user.user_id)?;

        Ok(UserPage {
            user,
            projects,
            skills,
        })
    }

    /// Every registered user, newest first.
    pub fn directory(&self) -> CoreResult<Vec<User>> {
        self.db.list_users()?.into_iter().map(user_view).collect()
    }
}

/// Public projection of an account row: drops the credential hash and
/// parses the stored ID.
pub fn user_view(row: UserRow) -> CoreResult<User> {
    let user_id = Uuid::parse_str(&row.user_id)
        .map_err(|e| CoreError::Store(anyhow!("malformed user id {:?}: {}", row.user_id, e)))?;

    Ok(User {
        user_id,
        email: row.email,
        nickname: row.nickname,
        name: row.name,
        description: row.description,
        profile_img: row.profile_img,
        position: row.position,
        created_at: row.created_at,
    })
}
