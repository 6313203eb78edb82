//! OpenAPI documentation
//!
//! Provides OpenAPI 3.0 specification and Swagger UI for the Letterpulse API.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::json;

/// Create OpenAPI routes
pub fn create_openapi_routes() -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(swagger_ui))
}

/// OpenAPI JSON specification endpoint
async fn openapi_json() -> impl IntoResponse {
    Json(get_openapi_spec())
}

/// Swagger UI HTML endpoint
async fn swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

/// Get the OpenAPI specification as JSON
fn get_openapi_spec() -> serde_json::Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Letterpulse API",
            "description": "REST API for the Letterpulse email delivery tracking service\n\n## Authentication\n\nManagement endpoints under `/api/v1` require an API key.\n\n- **Header**: `X-API-Key: <your-api-key>`\n- **Bearer**: `Authorization: Bearer <your-api-key>`\n\nTracking endpoints under `/track` are public; they authenticate through the tracking token itself.",
            "version": "1.0.0",
            "contact": {
                "name": "Letterpulse Team",
                "url": "https://github.com/example/letterpulse"
            },
            "license": {
                "name": "Apache-2.0",
                "url": "https://www.apache.org/licenses/LICENSE-2.0"
            }
        },
        "tags": [
            {"name": "health", "description": "Health check endpoints"},
            {"name": "tracking", "description": "Public tracking endpoints hit by mail clients"},
            {"name": "campaigns", "description": "Campaign lifecycle management"},
            {"name": "recipients", "description": "Campaign recipient management"},
            {"name": "analytics", "description": "Campaign engagement analytics"}
        ],
        "paths": {
            // Health endpoints
            "/health": {
                "get": {
                    "tags": ["health"],
                    "summary": "Basic health check",
                    "operationId": "health",
                    "responses": {
                        "200": {
                            "description": "Service is healthy",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/HealthResponse"}
                                }
                            }
                        }
                    }
                }
            },
            "/health/live": {
                "get": {
                    "tags": ["health"],
                    "summary": "Liveness probe",
                    "operationId": "liveness",
                    "responses": {
                        "200": {"description": "Service is alive"}
                    }
                }
            },
            "/health/ready": {
                "get": {
                    "tags": ["health"],
                    "summary": "Readiness probe",
                    "operationId": "readiness",
                    "responses": {
                        "200": {"description": "Service is ready"},
                        "503": {"description": "Service is not ready"}
                    }
                }
            },
            "/health/detailed": {
                "get": {
                    "tags": ["health"],
                    "summary": "Detailed health check",
                    "operationId": "healthDetailed",
                    "responses": {
                        "200": {"description": "Detailed health status"}
                    }
                }
            },
            // Tracking endpoints
            "/track/open/{token}": {
                "get": {
                    "tags": ["tracking"],
                    "summary": "Open tracking pixel",
                    "description": "Records an open event and returns a 1x1 transparent GIF. Always answers 200, even for malformed tokens.",
                    "operationId": "trackOpen",
                    "parameters": [
                        {"name": "token", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "responses": {
                        "200": {
                            "description": "Tracking pixel",
                            "content": {"image/gif": {}}
                        }
                    }
                }
            },
            "/track/click/{token}": {
                "get": {
                    "tags": ["tracking"],
                    "summary": "Click tracking redirect",
                    "description": "Records a click event and redirects to the decoded destination URL.",
                    "operationId": "trackClick",
                    "parameters": [
                        {"name": "token", "in": "path", "required": true, "schema": {"type": "string"}},
                        {"name": "url", "in": "query", "required": true, "schema": {"type": "string"}, "description": "Base64 URL-safe encoded destination"}
                    ],
                    "responses": {
                        "302": {"description": "Redirect to the destination URL"},
                        "400": {
                            "description": "Missing or undecodable destination",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                }
                            }
                        }
                    }
                }
            },
            "/track/unsubscribe": {
                "post": {
                    "tags": ["tracking"],
                    "summary": "Record an unsubscribe",
                    "operationId": "unsubscribe",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/UnsubscribeRequest"}
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Unsubscribe recorded",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/UnsubscribeResponse"}
                                }
                            }
                        },
                        "400": {"description": "Malformed body"}
                    }
                }
            },
            "/track/spam": {
                "post": {
                    "tags": ["tracking"],
                    "summary": "Record a spam complaint",
                    "operationId": "spamComplaint",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/SpamComplaintRequest"}
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Complaint recorded",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/SpamComplaintResponse"}
                                }
                            }
                        },
                        "400": {"description": "Malformed body or complaint type"}
                    }
                }
            },
            // Campaign endpoints
            "/api/v1/campaigns": {
                "get": {
                    "tags": ["campaigns"],
                    "summary": "List campaigns",
                    "operationId": "listCampaigns",
                    "security": [{"api_key": []}, {"bearer": []}],
                    "parameters": [
                        {"name": "status", "in": "query", "schema": {"$ref": "#/components/schemas/CampaignStatus"}},
                        {"name": "limit", "in": "query", "schema": {"type": "integer", "default": 50}},
                        {"name": "offset", "in": "query", "schema": {"type": "integer", "default": 0}}
                    ],
                    "responses": {
                        "200": {
                            "description": "List of campaigns",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/CampaignListResponse"}
                                }
                            }
                        }
                    }
                },
                "post": {
                    "tags": ["campaigns"],
                    "summary": "Create a draft campaign",
                    "operationId": "createCampaign",
                    "security": [{"api_key": []}, {"bearer": []}],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/CreateCampaignRequest"}
                            }
                        }
                    },
                    "responses": {
                        "201": {
                            "description": "Campaign created",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Campaign"}
                                }
                            }
                        },
                        "400": {"description": "Validation failed"}
                    }
                }
            },
            "/api/v1/campaigns/{campaign_id}": {
                "get": {
                    "tags": ["campaigns"],
                    "summary": "Get a campaign",
                    "operationId": "getCampaign",
                    "security": [{"api_key": []}, {"bearer": []}],
                    "parameters": [
                        {"name": "campaign_id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}}
                    ],
                    "responses": {
                        "200": {
                            "description": "The campaign",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Campaign"}
                                }
                            }
                        },
                        "404": {"description": "Campaign not found"}
                    }
                },
                "put": {
                    "tags": ["campaigns"],
                    "summary": "Update a draft campaign",
                    "operationId": "updateCampaign",
                    "security": [{"api_key": []}, {"bearer": []}],
                    "parameters": [
                        {"name": "campaign_id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}}
                    ],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/UpdateCampaignRequest"}
                            }
                        }
                    },
                    "responses": {
                        "200": {"description": "Campaign updated"},
                        "400": {"description": "Campaign is not in draft status"},
                        "404": {"description": "Campaign not found"}
                    }
                },
                "delete": {
                    "tags": ["campaigns"],
                    "summary": "Delete a draft campaign",
                    "operationId": "deleteCampaign",
                    "security": [{"api_key": []}, {"bearer": []}],
                    "parameters": [
                        {"name": "campaign_id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}}
                    ],
                    "responses": {
                        "204": {"description": "Campaign deleted"},
                        "400": {"description": "Campaign is not in draft status"},
                        "404": {"description": "Campaign not found"}
                    }
                }
            },
            "/api/v1/campaigns/{campaign_id}/schedule": {
                "post": {
                    "tags": ["campaigns"],
                    "summary": "Schedule a draft campaign",
                    "operationId": "scheduleCampaign",
                    "security": [{"api_key": []}, {"bearer": []}],
                    "parameters": [
                        {"name": "campaign_id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}}
                    ],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/ScheduleCampaignRequest"}
                            }
                        }
                    },
                    "responses": {
                        "200": {"description": "Campaign scheduled"},
                        "400": {"description": "Not a draft or time in the past"},
                        "404": {"description": "Campaign not found"}
                    }
                }
            },
            "/api/v1/campaigns/{campaign_id}/cancel": {
                "post": {
                    "tags": ["campaigns"],
                    "summary": "Cancel a scheduled campaign",
                    "operationId": "cancelCampaign",
                    "security": [{"api_key": []}, {"bearer": []}],
                    "parameters": [
                        {"name": "campaign_id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}}
                    ],
                    "responses": {
                        "200": {"description": "Campaign cancelled"},
                        "400": {"description": "Campaign is not scheduled"},
                        "404": {"description": "Campaign not found"}
                    }
                }
            },
            "/api/v1/campaigns/{campaign_id}/recipients": {
                "get": {
                    "tags": ["recipients"],
                    "summary": "List campaign recipients",
                    "operationId": "listRecipients",
                    "security": [{"api_key": []}, {"bearer": []}],
                    "parameters": [
                        {"name": "campaign_id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}},
                        {"name": "limit", "in": "query", "schema": {"type": "integer", "default": 50}},
                        {"name": "offset", "in": "query", "schema": {"type": "integer", "default": 0}}
                    ],
                    "responses": {
                        "200": {"description": "List of recipients"},
                        "404": {"description": "Campaign not found"}
                    }
                },
                "post": {
                    "tags": ["recipients"],
                    "summary": "Add recipients to a draft campaign",
                    "operationId": "addRecipients",
                    "security": [{"api_key": []}, {"bearer": []}],
                    "parameters": [
                        {"name": "campaign_id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}}
                    ],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/AddRecipientsRequest"}
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Add result with added and skipped counts",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/AddRecipientsResult"}
                                }
                            }
                        },
                        "400": {"description": "Campaign is not in draft status or invalid emails"},
                        "404": {"description": "Campaign not found"}
                    }
                },
                "delete": {
                    "tags": ["recipients"],
                    "summary": "Remove recipients from a draft campaign",
                    "operationId": "removeRecipients",
                    "security": [{"api_key": []}, {"bearer": []}],
                    "parameters": [
                        {"name": "campaign_id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}}
                    ],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/RemoveRecipientsRequest"}
                            }
                        }
                    },
                    "responses": {
                        "200": {"description": "Removal count"},
                        "400": {"description": "Campaign is not in draft status"},
                        "404": {"description": "Campaign not found"}
                    }
                }
            },
            "/api/v1/campaigns/{campaign_id}/analytics": {
                "get": {
                    "tags": ["analytics"],
                    "summary": "Get campaign analytics",
                    "operationId": "getCampaignAnalytics",
                    "security": [{"api_key": []}, {"bearer": []}],
                    "parameters": [
                        {"name": "campaign_id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}}
                    ],
                    "responses": {
                        "200": {
                            "description": "Derived engagement metrics",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/CampaignAnalytics"}
                                }
                            }
                        },
                        "404": {"description": "Campaign not found"}
                    }
                }
            }
        },
        "components": {
            "securitySchemes": {
                "api_key": {
                    "type": "apiKey",
                    "in": "header",
                    "name": "X-API-Key"
                },
                "bearer": {
                    "type": "http",
                    "scheme": "bearer"
                }
            },
            "schemas": {
                "HealthResponse": {
                    "type": "object",
                    "properties": {
                        "status": {"type": "string", "example": "healthy"},
                        "version": {"type": "string"}
                    }
                },
                "ErrorResponse": {
                    "type": "object",
                    "properties": {
                        "error": {"type": "string", "example": "VALIDATION_ERROR"},
                        "message": {"type": "string"}
                    }
                },
                "CampaignStatus": {
                    "type": "string",
                    "enum": ["draft", "scheduled", "sending", "sent", "cancelled"]
                },
                "Campaign": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string", "format": "uuid"},
                        "name": {"type": "string"},
                        "subject": {"type": "string"},
                        "from_address": {"type": "string"},
                        "from_name": {"type": "string", "nullable": true},
                        "html_body": {"type": "string", "nullable": true},
                        "text_body": {"type": "string", "nullable": true},
                        "status": {"$ref": "#/components/schemas/CampaignStatus"},
                        "scheduled_at": {"type": "string", "format": "date-time", "nullable": true},
                        "track_opens": {"type": "boolean"},
                        "track_clicks": {"type": "boolean"},
                        "track_unsubscribes": {"type": "boolean"},
                        "tags": {"type": "array", "items": {"type": "string"}},
                        "created_at": {"type": "string", "format": "date-time"},
                        "updated_at": {"type": "string", "format": "date-time"}
                    }
                },
                "CampaignListResponse": {
                    "type": "object",
                    "properties": {
                        "data": {"type": "array", "items": {"$ref": "#/components/schemas/Campaign"}},
                        "total": {"type": "integer"},
                        "limit": {"type": "integer"},
                        "offset": {"type": "integer"}
                    }
                },
                "CreateCampaignRequest": {
                    "type": "object",
                    "required": ["name", "subject", "from_address"],
                    "properties": {
                        "name": {"type": "string"},
                        "subject": {"type": "string"},
                        "from_address": {"type": "string", "format": "email"},
                        "from_name": {"type": "string"},
                        "html_body": {"type": "string"},
                        "text_body": {"type": "string"},
                        "track_opens": {"type": "boolean", "default": true},
                        "track_clicks": {"type": "boolean", "default": true},
                        "track_unsubscribes": {"type": "boolean", "default": true},
                        "tags": {"type": "array", "items": {"type": "string"}}
                    }
                },
                "UpdateCampaignRequest": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "subject": {"type": "string"},
                        "from_address": {"type": "string", "format": "email"},
                        "from_name": {"type": "string"},
                        "html_body": {"type": "string"},
                        "text_body": {"type": "string"},
                        "track_opens": {"type": "boolean"},
                        "track_clicks": {"type": "boolean"},
                        "track_unsubscribes": {"type": "boolean"},
                        "tags": {"type": "array", "items": {"type": "string"}}
                    }
                },
                "ScheduleCampaignRequest": {
                    "type": "object",
                    "required": ["scheduled_at"],
                    "properties": {
                        "scheduled_at": {"type": "string", "format": "date-time"}
                    }
                },
                "AddRecipientsRequest": {
                    "type": "object",
                    "required": ["recipients"],
                    "properties": {
                        "recipients": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["subscriber_id", "email"],
                                "properties": {
                                    "subscriber_id": {"type": "string", "format": "uuid"},
                                    "email": {"type": "string", "format": "email"}
                                }
                            }
                        }
                    }
                },
                "RemoveRecipientsRequest": {
                    "type": "object",
                    "required": ["subscriber_ids"],
                    "properties": {
                        "subscriber_ids": {
                            "type": "array",
                            "items": {"type": "string", "format": "uuid"}
                        }
                    }
                },
                "AddRecipientsResult": {
                    "type": "object",
                    "properties": {
                        "added": {"type": "integer"},
                        "skipped": {"type": "integer"},
                        "total": {"type": "integer"}
                    }
                },
                "CampaignAnalytics": {
                    "type": "object",
                    "properties": {
                        "campaign_id": {"type": "string", "format": "uuid"},
                        "status": {"$ref": "#/components/schemas/CampaignStatus"},
                        "total_sent": {"type": "integer"},
                        "total_opened": {"type": "integer"},
                        "total_clicked": {"type": "integer"},
                        "total_unsubscribed": {"type": "integer"},
                        "total_complained": {"type": "integer"},
                        "open_rate": {"type": "number"},
                        "click_rate": {"type": "number"},
                        "unsubscribe_rate": {"type": "number"}
                    }
                },
                "UnsubscribeRequest": {
                    "type": "object",
                    "required": ["email_id", "subscriber_id", "campaign_id"],
                    "properties": {
                        "email_id": {"type": "string", "format": "uuid"},
                        "subscriber_id": {"type": "string", "format": "uuid"},
                        "campaign_id": {"type": "string", "format": "uuid"},
                        "reason": {"type": "string"}
                    }
                },
                "SpamComplaintRequest": {
                    "type": "object",
                    "required": ["email_id", "subscriber_id", "campaign_id"],
                    "properties": {
                        "email_id": {"type": "string", "format": "uuid"},
                        "subscriber_id": {"type": "string", "format": "uuid"},
                        "campaign_id": {"type": "string", "format": "uuid"},
                        "complaint_type": {"type": "string", "enum": ["spam", "abuse", "other"]},
                        "feedback": {"type": "string"}
                    }
                },
                "TrackingEvent": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string", "format": "uuid"},
                        "event_type": {"type": "string"},
                        "email_id": {"type": "string", "format": "uuid"},
                        "subscriber_id": {"type": "string", "format": "uuid"},
                        "campaign_id": {"type": "string", "format": "uuid"},
                        "link_id": {"type": "string", "format": "uuid", "nullable": true},
                        "destination_url": {"type": "string", "nullable": true},
                        "ip_address": {"type": "string", "nullable": true},
                        "user_agent": {"type": "string", "nullable": true},
                        "complaint_type": {"type": "string", "nullable": true},
                        "feedback": {"type": "string", "nullable": true},
                        "occurred_at": {"type": "string", "format": "date-time"}
                    }
                },
                "UnsubscribeResponse": {
                    "type": "object",
                    "properties": {
                        "message": {"type": "string"},
                        "unsubscribe": {"$ref": "#/components/schemas/TrackingEvent"}
                    }
                },
                "SpamComplaintResponse": {
                    "type": "object",
                    "properties": {
                        "message": {"type": "string"},
                        "complaint": {"$ref": "#/components/schemas/TrackingEvent"}
                    }
                }
            }
        }
    })
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Letterpulse API Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        body { margin: 0; padding: 0; }
        .swagger-ui .topbar { display: none; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: "/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIBundle.SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_all_endpoints() {
        let spec = get_openapi_spec();
        let paths = spec["paths"].as_object().unwrap();

        for path in [
            "/health",
            "/track/open/{token}",
            "/track/click/{token}",
            "/track/unsubscribe",
            "/track/spam",
            "/api/v1/campaigns",
            "/api/v1/campaigns/{campaign_id}",
            "/api/v1/campaigns/{campaign_id}/schedule",
            "/api/v1/campaigns/{campaign_id}/cancel",
            "/api/v1/campaigns/{campaign_id}/recipients",
            "/api/v1/campaigns/{campaign_id}/analytics",
        ] {
            assert!(paths.contains_key(path), "missing path: {}", path);
        }
    }
}
